use crate::finding::{ScanReport, Severity};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, PhysicalLocation, Region, Result as SarifResult,
    ResultLevel, Run, Sarif, Tool, ToolComponent,
};

pub fn format(report: &ScanReport) -> String {
    let results: Vec<SarifResult> = report
        .diagnostics
        .iter()
        .map(|d| {
            let level = match d.severity {
                Severity::Error => ResultLevel::Error,
                Severity::Warning => ResultLevel::Warning,
                Severity::Hint => ResultLevel::Note,
            };

            let mut result = SarifResult::builder()
                .message(Message::builder().text(d.message.clone()).build())
                .build();
            result.level = Some(level);

            let uri = d.file.replace('\\', "/");
            let mut location = Location::builder().build();
            let mut physical = PhysicalLocation::builder().build();
            physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());
            if let Some(line) = d.line {
                physical.region = Some(Region::builder().start_line(line as i64).build());
            }
            location.physical_location = Some(physical);
            result.locations = Some(vec![location]);

            result
        })
        .collect();

    let driver = ToolComponent::builder()
        .name("steampunk-scanner")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .build();

    let tool = Tool::builder().driver(driver).build();

    let run = Run::builder().tool(tool).results(results).build();

    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif).expect("SARIF serialization failed")
}
