use crate::runner::Suite;
use crate::OutputFormat;

pub(crate) fn cmd_list(suite: Suite, output: OutputFormat) {
    let scenarios = suite.scenarios();
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "protocol": suite.protocol(),
                "scenarios": scenarios,
            });
            println!("{:#}", json);
        }
        OutputFormat::Text => {
            println!("{} ({} scenarios)", suite.protocol(), scenarios.len());
            for s in scenarios {
                println!("  {:<14} {}::{}", s.case, s.category, s.name);
            }
        }
    }
}
