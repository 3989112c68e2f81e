use crate::record::{AuditReport, PackageRecord};
use crate::risk::RiskLevel;
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};

struct PolicyRule {
    id: &'static str,
    risk: RiskLevel,
    level: ResultLevel,
    description: &'static str,
    help: &'static str,
}

fn policy_rules() -> Vec<PolicyRule> {
    vec![
        PolicyRule {
            id: "policy/stale-open-ended-high",
            risk: RiskLevel::High,
            level: ResultLevel::Error,
            description: "Open-ended platform support and no update for a year or more; qualifies for removal from the next index",
            help: "Publish a release, or replace open-ended specifiers with explicit versions or a closed range",
        },
        PolicyRule {
            id: "policy/stale-open-ended-medium",
            risk: RiskLevel::Medium,
            level: ResultLevel::Warning,
            description: "Open-ended platform support and no update for nine months or more",
            help: "Publish a release before the removal threshold is reached",
        },
        PolicyRule {
            id: "policy/stale-open-ended-low",
            risk: RiskLevel::Low,
            level: ResultLevel::Note,
            description: "Open-ended platform support and no update for six months or more",
            help: "Plan a release, or bound the supported platform versions",
        },
        PolicyRule {
            id: "policy/unknown-last-update",
            risk: RiskLevel::Unknown,
            level: ResultLevel::Note,
            description: "Last update of the package could not be determined",
            help: "Make sure the package directory is tracked in version control",
        },
    ]
}

pub fn format(report: &AuditReport) -> String {
    let rules_table = policy_rules();

    let rules: Vec<ReportingDescriptor> = rules_table
        .iter()
        .map(|r| {
            let mut rule = ReportingDescriptor::builder().id(r.id.to_string()).build();
            rule.short_description = Some(
                MultiformatMessageString::builder()
                    .text(r.description.to_string())
                    .build(),
            );
            rule.help = Some(
                MultiformatMessageString::builder()
                    .text(r.help.to_string())
                    .build(),
            );
            rule
        })
        .collect();

    let results: Vec<SarifResult> = report
        .packages
        .iter()
        .filter_map(|p| {
            let index = rules_table.iter().position(|r| r.risk == p.risk)?;
            Some(package_result(p, &rules_table[index], index as i64))
        })
        .collect();

    let driver = ToolComponent::builder()
        .name("operator-audit")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();

    let tool = Tool::builder().driver(driver).build();

    let run = Run::builder().tool(tool).results(results).build();

    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif).expect("SARIF serialization failed")
}

fn package_result(package: &PackageRecord, rule: &PolicyRule, index: i64) -> SarifResult {
    let text = match package.months_since_update {
        Some(months) => format!(
            "{}: {} specifier, last updated {:.1} months ago",
            package.name, package.shape, months
        ),
        None => format!("{}: last update unknown", package.name),
    };

    let mut result = SarifResult::builder()
        .message(Message::builder().text(text).build())
        .build();

    result.rule_id = Some(rule.id.to_string());
    result.level = Some(rule.level.clone());
    result.rule_index = Some(index);

    let uri = package.path.to_string_lossy().replace('\\', "/");
    let mut location = Location::builder().build();
    let mut physical = PhysicalLocation::builder().build();
    physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());
    location.physical_location = Some(physical);
    result.locations = Some(vec![location]);

    result
}
