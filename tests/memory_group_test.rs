use async_trait::async_trait;
use groupctl::domain::ports::FleetClient;
use groupctl::{load_group, Controller, FleetError, MemoryFileSystem, Request, UnitStatus};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Fleet stand-in that records submitted units.
#[derive(Clone, Default)]
struct RecordingFleet {
    submitted: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl FleetClient for RecordingFleet {
    async fn submit(&self, name: &str, content: &str) -> Result<(), FleetError> {
        self.submitted
            .lock()
            .await
            .push((name.to_string(), content.to_string()));
        Ok(())
    }

    async fn start(&self, _name: &str) -> Result<(), FleetError> {
        Ok(())
    }

    async fn stop(&self, _name: &str) -> Result<(), FleetError> {
        Ok(())
    }

    async fn destroy(&self, _name: &str) -> Result<(), FleetError> {
        Ok(())
    }

    async fn get_status(&self, name: &str) -> Result<UnitStatus, FleetError> {
        Err(FleetError::UnitNotFound(name.to_string()))
    }
}

#[tokio::test]
async fn test_group_in_memory_is_submitted_per_slice() {
    let fs = MemoryFileSystem::new();
    fs.write_file("queue/worker@.service", "[Service]\nExecStart=/bin/worker\n")
        .unwrap();
    fs.write_file("queue/notes/TODO.md", "ignored").unwrap();

    let fleet = RecordingFleet::default();
    let controller = Controller::new(fleet.clone());

    let request = load_group(&fs, &Request::new("queue").with_slice_ids(["a", "b"]))
        .await
        .unwrap();
    controller.submit(&request).await.unwrap();

    let submitted = fleet.submitted.lock().await.clone();
    assert_eq!(
        submitted,
        vec![
            (
                "worker@a.service".to_string(),
                "[Service]\nExecStart=/bin/worker\n".to_string()
            ),
            (
                "worker@b.service".to_string(),
                "[Service]\nExecStart=/bin/worker\n".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_loading_leaves_input_request_untouched() {
    let fs = MemoryFileSystem::new();
    fs.write_file("queue/worker@.service", "x").unwrap();
    let input = Request::new("queue").with_slice_ids(["1"]);

    let loaded = load_group(&fs, &input).await.unwrap();
    let extended = loaded.extend_slices().unwrap();

    assert!(input.units.is_empty());
    assert_eq!(loaded.units.len(), 1);
    assert_eq!(loaded.units[0].name, "worker@.service");
    assert_eq!(extended.units[0].name, "worker@1.service");
}
