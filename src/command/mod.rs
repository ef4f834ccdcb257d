use json_patch::merge;
use serde::Serialize;
use serde_json::json;

/// A helper function to merge types serializeable to a JSON object.
pub fn merge_commands<S: Serialize>(commands: &[S]) -> serde_json::Value {
    let mut map = json!({});
    for cmd in commands {
        merge(&mut map, &serde_json::to_value(cmd).unwrap());
    }
    map
}

/// Commands for an [EntertainmentConfigurationData](crate::service::EntertainmentConfigurationData).
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntertainmentConfigurationCommand {
    Action(EntertainmentAction),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntertainmentAction {
    Start,
    Stop,
}
