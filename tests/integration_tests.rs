use anyhow::Result;
use groupctl::{
    load_group, Controller, ControllerError, FleetError, FleetSettings, HttpFleetClient,
    LocalFileSystem, Request, Verb,
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn given_some_unit_file_content() -> String {
    "[Unit]\n\
     Description=Some Unit File Content\n\
     \n\
     [Service]\n\
     ExecStart=/bin/bash -c 'while true; do echo nothing to see, go along; done'\n"
        .to_string()
}

fn setup_group(files: &[(&str, &str)]) -> Result<TempDir> {
    let temp_dir = TempDir::new()?;
    for (path, content) in files {
        let full_path = temp_dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(full_path, content)?;
    }
    Ok(temp_dir)
}

fn controller_for(server: &MockServer) -> Result<Controller<HttpFleetClient>> {
    controller_with_timeout(server, 5)
}

fn controller_with_timeout(
    server: &MockServer,
    timeout_secs: u64,
) -> Result<Controller<HttpFleetClient>> {
    let fleet = HttpFleetClient::new(&FleetSettings {
        endpoint: server.base_url(),
        timeout_secs,
    })?;
    Ok(Controller::new(fleet))
}

#[tokio::test]
async fn test_submit_group_from_disk_with_slices() -> Result<()> {
    let content = given_some_unit_file_content();
    let temp_dir = setup_group(&[
        ("web/web@.service", content.as_str()),
        ("web/web-discovery@.service", content.as_str()),
        ("web/docs/README.md", "DO NOT READ ME"),
    ])?;

    let server = MockServer::start();
    let mut mocks = Vec::new();
    for name in [
        "web-discovery@1.service",
        "web@1.service",
        "web-discovery@2.service",
        "web@2.service",
    ] {
        mocks.push(server.mock(|when, then| {
            when.method(PUT)
                .path(format!("/fleet/v1/units/{}", name))
                .json_body_partial(r#"{"desiredState": "loaded"}"#);
            then.status(201);
        }));
    }

    let fs = LocalFileSystem::new(temp_dir.path());
    let request = load_group(&fs, &Request::new("web").with_slice_ids(["1", "2"])).await?;
    assert_eq!(request.units.len(), 2);

    controller_for(&server)?.submit(&request).await?;

    for mock in &mocks {
        mock.assert();
    }
    Ok(())
}

#[tokio::test]
async fn test_fail_fast_stops_at_first_rejected_unit() -> Result<()> {
    let content = given_some_unit_file_content();
    let temp_dir = setup_group(&[
        ("api/a@.service", content.as_str()),
        ("api/b@.service", content.as_str()),
        ("api/c@.service", content.as_str()),
    ])?;

    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(PUT).path("/fleet/v1/units/a@1.service");
        then.status(204);
    });
    let second = server.mock(|when, then| {
        when.method(PUT).path("/fleet/v1/units/b@1.service");
        then.status(500)
            .json_body(json!({"error": {"code": 500, "message": "registry unavailable"}}));
    });
    let third = server.mock(|when, then| {
        when.method(PUT).path("/fleet/v1/units/c@1.service");
        then.status(204);
    });

    let fs = LocalFileSystem::new(temp_dir.path());
    let request = load_group(&fs, &Request::new("api").with_slice_ids(["1"])).await?;

    let err = controller_for(&server)?
        .submit(&request)
        .await
        .expect_err("second unit must fail the batch");

    assert_eq!(err.failed_unit(), Some("b@1.service"));
    assert!(err.to_string().contains("registry unavailable"));
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 1);
    assert_eq!(third.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_timed_out_unit_aborts_the_batch() -> Result<()> {
    let content = given_some_unit_file_content();
    let temp_dir = setup_group(&[
        ("slow/a@.service", content.as_str()),
        ("slow/b@.service", content.as_str()),
    ])?;

    let server = MockServer::start();
    let hanging = server.mock(|when, then| {
        when.method(PUT).path("/fleet/v1/units/a@1.service");
        then.status(204).delay(Duration::from_secs(3));
    });
    let never_reached = server.mock(|when, then| {
        when.method(PUT).path("/fleet/v1/units/b@1.service");
        then.status(204);
    });

    let fs = LocalFileSystem::new(temp_dir.path());
    let request = load_group(&fs, &Request::new("slow").with_slice_ids(["1"])).await?;

    let err = controller_with_timeout(&server, 1)?
        .start(&request)
        .await
        .expect_err("timed out unit must fail the batch");

    assert!(matches!(
        err,
        ControllerError::SchedulerOperationFailure {
            verb: Verb::Start,
            source: FleetError::Transport(_),
            ..
        }
    ));
    assert_eq!(err.failed_unit(), Some("a@1.service"));
    assert_eq!(hanging.hits(), 1);
    assert_eq!(never_reached.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_round_trip_without_slices_issues_no_calls() -> Result<()> {
    let content = given_some_unit_file_content();
    let temp_dir = setup_group(&[
        ("groupname/groupname-1.service", content.as_str()),
        ("groupname/groupname-2.service", content.as_str()),
    ])?;

    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.path_contains("/fleet/v1");
        then.status(204);
    });

    let fs = LocalFileSystem::new(temp_dir.path());
    let request = load_group(&fs, &Request::new("groupname")).await?;

    let names: Vec<&str> = request.units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["groupname-1.service", "groupname-2.service"]);
    assert!(request.units.iter().all(|u| u.content == content));

    controller_for(&server)?.submit(&request).await?;

    assert_eq!(any.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_group_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let fs = LocalFileSystem::new(temp_dir.path());

    let err = load_group(&fs, &Request::new("nope"))
        .await
        .expect_err("missing group must fail");

    assert!(err.is_directory_not_found());
    assert!(err.to_string().contains("nope"));
    Ok(())
}

#[tokio::test]
async fn test_status_of_unknown_unit() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/fleet/v1/units/web@1.service");
        then.status(404)
            .json_body(json!({"error": {"code": 404, "message": "unit does not exist"}}));
    });

    let request = Request::default()
        .with_slice_ids(["1"])
        .with_units(vec![groupctl::Unit::new("web@.service", "")]);

    let err = controller_for(&server)?
        .run(Verb::GetStatus, &request)
        .await
        .expect_err("unknown unit must fail");

    assert!(err.is_unit_not_found());
    Ok(())
}
