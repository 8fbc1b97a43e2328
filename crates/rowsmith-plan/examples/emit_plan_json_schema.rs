use rowsmith_plan::plan_json_schema;

fn main() -> Result<(), serde_json::Error> {
    let schema = plan_json_schema();
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{json}");
    Ok(())
}
