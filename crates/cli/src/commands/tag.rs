use crate::commands::CommandResult;
use kilo_core::intent::IntentTagger;
use serde_json::json;

/// Runs the keyword tagger offline; no config or database needed.
pub fn run(message: &str) -> CommandResult {
    if message.trim().is_empty() {
        return CommandResult::failure("tag", "input_validation", "No message provided", 2);
    }

    let tagger = IntentTagger::default();
    let actions = tagger.tag(message, None);
    let actionable = actions.iter().filter(|action| action.priority.is_actionable()).count();

    CommandResult::success_with_data(
        "tag",
        format!("{} action(s) tagged, {actionable} actionable", actions.len()),
        Some(json!({
            "rules_version": tagger.rules_version(),
            "actions": actions,
        })),
    )
}
