use crate::domain::model::{Request, UnitStatus, Verb};
use crate::domain::ports::FleetClient;
use crate::utils::error::{ControllerError, Result};

/// Runs lifecycle operations for groups of units against fleet.
///
/// Every operation expands the request first and then issues one fleet call
/// per unit, in order, one at a time. The first failing unit aborts the rest
/// of the batch; units handled before it are not rolled back.
pub struct Controller<F: FleetClient> {
    fleet: F,
}

impl<F: FleetClient> Controller<F> {
    pub fn new(fleet: F) -> Self {
        Self { fleet }
    }

    /// Schedules a group by setting its units to loaded.
    pub async fn submit(&self, request: &Request) -> Result<()> {
        self.run(Verb::Submit, request).await.map(drop)
    }

    /// Starts a group by setting its units to launched.
    pub async fn start(&self, request: &Request) -> Result<()> {
        self.run(Verb::Start, request).await.map(drop)
    }

    /// Stops a group by setting its units back to loaded.
    pub async fn stop(&self, request: &Request) -> Result<()> {
        self.run(Verb::Stop, request).await.map(drop)
    }

    /// Removes the units of a group from the cluster.
    pub async fn destroy(&self, request: &Request) -> Result<()> {
        self.run(Verb::Destroy, request).await.map(drop)
    }

    /// Fetches the status of every unit, aligned with the expanded unit
    /// order. A unit fleet does not know fails with an error for which
    /// [`ControllerError::is_unit_not_found`] holds.
    pub async fn get_status(&self, request: &Request) -> Result<Vec<UnitStatus>> {
        self.run(Verb::GetStatus, request).await
    }

    /// Dispatches `verb` for every unit of the expanded request. Only
    /// [`Verb::GetStatus`] produces statuses.
    pub async fn run(&self, verb: Verb, request: &Request) -> Result<Vec<UnitStatus>> {
        let extended = request.extend_slices()?;
        if extended.units.is_empty() {
            tracing::warn!(
                "Nothing to {} for group '{}': {} units x {} slices",
                verb,
                request.group,
                request.units.len(),
                request.slice_ids.len()
            );
            return Ok(Vec::new());
        }

        let mut statuses = Vec::new();
        for unit in &extended.units {
            tracing::debug!("{} {}", verb, unit.name);

            let outcome = match verb {
                Verb::Submit => self.fleet.submit(&unit.name, &unit.content).await.map(|()| None),
                Verb::Start => self.fleet.start(&unit.name).await.map(|()| None),
                Verb::Stop => self.fleet.stop(&unit.name).await.map(|()| None),
                Verb::Destroy => self.fleet.destroy(&unit.name).await.map(|()| None),
                Verb::GetStatus => self.fleet.get_status(&unit.name).await.map(Some),
            };

            match outcome {
                Ok(Some(status)) => statuses.push(status),
                Ok(None) => {}
                Err(source) => {
                    tracing::debug!("{} aborted at unit {}: {}", verb, unit.name, source);
                    return Err(ControllerError::scheduler(verb, &unit.name, source));
                }
            }
        }

        tracing::info!(
            "{} completed for {} units of group '{}'",
            verb,
            extended.units.len(),
            request.group
        );

        Ok(statuses)
    }
}
