use serde::{Deserialize, Serialize};

/// A single unit file as the scheduler knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Something like "appd@.service" before expansion and "appd@3.service"
    /// after it.
    pub name: String,
    pub content: String,
}

impl Unit {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// One lifecycle invocation against a group of units.
///
/// Requests are built fresh for every call and never mutated in place:
/// loading and expansion both hand back a new `Request`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Directory the units are loaded from. Empty once expanded.
    #[serde(default)]
    pub group: String,
    /// Replica IDs to instantiate, e.g. "1", "first", "whatever".
    #[serde(default)]
    pub slice_ids: Vec<String>,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Request {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            ..Self::default()
        }
    }

    pub fn with_slice_ids<I, S>(mut self, slice_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slice_ids = slice_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_units(mut self, units: Vec<Unit>) -> Self {
        self.units = units;
        self
    }
}

/// State of a unit as reported by fleet. Forwarded to callers untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStatus {
    pub name: String,
    #[serde(default)]
    pub current_state: String,
    #[serde(default)]
    pub desired_state: String,
    #[serde(default, rename = "machineID")]
    pub machine_id: String,
    #[serde(default)]
    pub machines: Vec<MachineState>,
}

/// systemd view of a unit on one machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    #[serde(default, rename = "machineID")]
    pub machine_id: String,
    #[serde(default, rename = "systemdLoadState")]
    pub load_state: String,
    #[serde(default, rename = "systemdActiveState")]
    pub active_state: String,
    #[serde(default, rename = "systemdSubState")]
    pub sub_state: String,
}

impl MachineState {
    pub fn is_running(&self) -> bool {
        self.active_state == "active" && self.sub_state == "running"
    }
}

/// Lifecycle operation requested for every unit of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Submit,
    Start,
    Stop,
    Destroy,
    GetStatus,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Submit => "submit",
            Verb::Start => "start",
            Verb::Stop => "stop",
            Verb::Destroy => "destroy",
            Verb::GetStatus => "status",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
