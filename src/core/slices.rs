use crate::domain::model::{Request, Unit};
use crate::utils::error::Result;
use regex::{NoExpand, Regex};
use std::sync::LazyLock;

/// Marks a templated unit name, as in "appd@.service".
///
/// The dot is matched literally, so "appd@Xservice" is not a template.
/// Unescaped ("@.service") the dot would match any character there.
pub const UNIT_TEMPLATE_MARKER: &str = r"@\.service";

static UNIT_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(UNIT_TEMPLATE_MARKER).expect("unit template marker is a valid regex"));

/// Name of the instance of `name` for `slice_id`. Names without the marker
/// come back verbatim.
pub fn instance_name(name: &str, slice_id: &str) -> String {
    let replacement = format!("@{}.service", slice_id);
    UNIT_TEMPLATE
        .replace_all(name, NoExpand(&replacement))
        .into_owned()
}

impl Request {
    /// Expands every unit once per slice ID.
    ///
    /// The result is slice-major: all units of the first slice, then all
    /// units of the second, and so on. That order is the dispatch order.
    /// Without slice IDs there is nothing to instantiate and the expanded
    /// request carries no units. Units without a template marker are still
    /// copied once per slice, unchanged.
    pub fn extend_slices(&self) -> Result<Request> {
        let mut units = Vec::with_capacity(self.slice_ids.len() * self.units.len());

        for slice_id in &self.slice_ids {
            for unit in &self.units {
                units.push(Unit {
                    name: instance_name(&unit.name, slice_id),
                    content: unit.content.clone(),
                });
            }
        }

        Ok(Request {
            group: String::new(),
            slice_ids: self.slice_ids.clone(),
            units,
        })
    }
}
