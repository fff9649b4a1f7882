//! The operation matrix as seen through the public adapter surface.
//!
//! Every call here goes to a recording client answering `200 {}`, so a
//! supported operation either succeeds or fails on the empty response,
//! while an unsupported one fails with `NOT_IMPLEMENTED` before sending.

mod common;

use common::RecordingClient;
use slurm_adapter::{ApiVersion, ErrorKind, Operation, RequestContext, VersionAdapter, build};
use slurm_types::{
    AccountAssociationRequest, AssociationOptions, Cluster, JobAllocation, NodeUpdate,
    PartitionUpdate, ReservationCreate, TresDefinition, UserAssociationRequest, WcKey,
};
use test_case::test_case;

fn assert_not_implemented(err: &slurm_adapter::SlurmError, version: ApiVersion) {
    assert_eq!(err.kind(), ErrorKind::NotImplemented, "{err}");
    assert_eq!(err.version(), Some(version));
}

// ============================================================================
// Matrix
// ============================================================================

#[test_case("v0.0.40", &[Operation::JobUpdate, Operation::Config, Operation::PingDatabase] ; "v40 lacks")]
#[test_case("v0.0.40", &[Operation::JobAllocate, Operation::Instances, Operation::AccountCreateAssociation] ; "v40 lacks later additions")]
#[test_case("v0.0.41", &[Operation::JobSignal, Operation::WcKeyList, Operation::ClusterList] ; "v41 lacks")]
#[test_case("v0.0.41", &[Operation::JobAllocate, Operation::JobNotify, Operation::UserCreateAssociation] ; "v41 lacks allocate and notify")]
#[test_case("v0.0.42", &[Operation::ReservationCreate, Operation::JobWatch, Operation::CreateTres] ; "v42 lacks")]
#[test_case("v0.0.42", &[Operation::JobNotify, Operation::Instance, Operation::AccountCreateAssociation] ; "v42 lacks notify and instances")]
#[test_case("v0.0.44", &[Operation::Instance, Operation::Instances] ; "v44 lacks instances")]
#[test_case("v0.0.43", &[Operation::PartitionCreate, Operation::PartitionUpdate, Operation::PartitionDelete] ; "v43 lacks")]
#[test_case("v0.0.44", &[Operation::JobSignal, Operation::Reconfigure, Operation::PartitionDelete] ; "v44 lacks")]
fn version_lacks(version: &str, lacking: &[Operation]) {
    let adapter = build(version, RecordingClient::new()).unwrap();
    let unsupported = adapter.capabilities().unsupported();
    for op in lacking {
        assert!(unsupported.contains(op), "{version} should lack {op}");
    }
}

#[test]
fn core_reads_exist_everywhere() {
    let always = [
        Operation::JobList,
        Operation::JobGet,
        Operation::JobSubmit,
        Operation::JobCancel,
        Operation::NodeList,
        Operation::PartitionList,
        Operation::AccountList,
        Operation::AssociationList,
        Operation::QosList,
        Operation::ReservationList,
        Operation::UserList,
        Operation::Ping,
        Operation::Licenses,
    ];
    for version in ApiVersion::ALL {
        let adapter = build(version.as_str(), RecordingClient::new()).unwrap();
        for op in always {
            assert!(adapter.capabilities().supports(op), "{version} lacks {op}");
        }
    }
}

// ============================================================================
// Gated calls never reach the wire
// ============================================================================

#[tokio::test]
async fn partition_writes_fail_in_every_version() {
    let ctx = RequestContext::new();
    for version in ApiVersion::ALL {
        let client = RecordingClient::new();
        let adapter = build(version.as_str(), client.clone()).unwrap();

        let err = adapter
            .partitions()
            .update(&ctx, "batch", &PartitionUpdate::default())
            .await
            .unwrap_err();
        assert_not_implemented(&err, version);
        let err = adapter.partitions().delete(&ctx, "batch").await.unwrap_err();
        assert_not_implemented(&err, version);
        assert!(client.requests().is_empty(), "{version}");
    }
}

#[tokio::test]
async fn wckeys_and_clusters_missing_from_v0041() {
    let client = RecordingClient::new();
    let adapter = build("v0.0.41", client.clone()).unwrap();
    let ctx = RequestContext::new();

    let err = adapter
        .wckeys()
        .create(&ctx, &WcKey::default())
        .await
        .unwrap_err();
    assert_not_implemented(&err, ApiVersion::V0041);
    let err = adapter
        .clusters()
        .create(&ctx, &Cluster::new("c1"))
        .await
        .unwrap_err();
    assert_not_implemented(&err, ApiVersion::V0041);
    assert!(client.requests().is_empty());
}

#[test_case("v0.0.40", true ; "v40")]
#[test_case("v0.0.41", true ; "v41")]
#[test_case("v0.0.42", false ; "v42")]
#[test_case("v0.0.43", true ; "v43")]
#[test_case("v0.0.44", true ; "v44")]
fn node_and_qos_delete_missing_from_v0042(version: &str, supported: bool) {
    let adapter = build(version, RecordingClient::new()).unwrap();
    let caps = adapter.capabilities();
    assert_eq!(caps.supports(Operation::NodeDelete), supported);
    assert_eq!(caps.supports(Operation::QosDelete), supported);
}

#[tokio::test]
async fn create_tres_and_reconfigure_on_odd_releases() {
    let ctx = RequestContext::new();
    let definitions = [TresDefinition {
        kind: "license".into(),
        name: Some("matlab".into()),
        ..TresDefinition::default()
    }];

    for version in ApiVersion::ALL {
        let client = RecordingClient::new();
        let adapter = build(version.as_str(), client.clone()).unwrap();
        let exposed = matches!(version, ApiVersion::V0041 | ApiVersion::V0043);

        let tres = adapter.standalone().create_tres(&ctx, &definitions).await;
        let reconfigure = adapter.standalone().reconfigure(&ctx).await;
        if exposed {
            tres.unwrap();
            reconfigure.unwrap();
            assert_eq!(client.requests().len(), 2, "{version}");
        } else {
            assert_not_implemented(&tres.unwrap_err(), version);
            assert_not_implemented(&reconfigure.unwrap_err(), version);
            assert!(client.requests().is_empty(), "{version}");
        }
    }
}

#[tokio::test]
async fn reservation_writes_from_v0043() {
    let ctx = RequestContext::new();
    for version in ApiVersion::ALL {
        let client = RecordingClient::new();
        let adapter = build(version.as_str(), client.clone()).unwrap();
        let result = adapter
            .reservations()
            .create(&ctx, &ReservationCreate::default())
            .await;
        let err = result.unwrap_err();
        if version >= ApiVersion::V0043 {
            assert_eq!(err.kind(), ErrorKind::ValidationFailed, "{version}");
        } else {
            assert_not_implemented(&err, version);
        }
        assert!(client.requests().is_empty(), "{version}");
    }
}

#[tokio::test]
async fn drain_is_a_node_update_everywhere() {
    let ctx = RequestContext::new();
    for version in ApiVersion::ALL {
        let client = RecordingClient::new();
        let adapter = build(version.as_str(), client.clone()).unwrap();
        adapter.nodes().drain(&ctx, "n1", "maintenance").await.unwrap();
        let sent = client.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, format!("/slurm/{}/node/n1", version.as_str()));
        assert_eq!(sent[0].body.as_ref().unwrap()["reason"], "maintenance");
    }
}

#[tokio::test]
async fn cancelled_context_sends_nothing() {
    let client = RecordingClient::new();
    let adapter = build("latest", client.clone()).unwrap();
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = adapter.jobs().list(&ctx, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(!err.kind().is_retryable());

    let err = adapter
        .nodes()
        .update(&ctx, "n1", &NodeUpdate::resume())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn allocate_from_v0042_sends_nothing_before() {
    let ctx = RequestContext::new();
    let mut allocation = JobAllocation::new("physics");
    allocation.nodes = Some(1);

    for version in ApiVersion::ALL {
        let client = RecordingClient::new();
        let adapter = build(version.as_str(), client.clone()).unwrap();
        let result = adapter.jobs().allocate(&ctx, &allocation).await;
        if version >= ApiVersion::V0042 {
            // `200 {}` carries no job id.
            assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedResponse, "{version}");
            let sent = client.requests();
            assert_eq!(sent.len(), 1, "{version}");
            assert_eq!(sent[0].path, format!("/slurm/{}/job/allocate", version.as_str()));
        } else {
            assert_not_implemented(&result.unwrap_err(), version);
            assert!(client.requests().is_empty(), "{version}");
        }
    }
}

#[tokio::test]
async fn notify_and_association_creation_from_v0043() {
    let ctx = RequestContext::new();
    let accounts = AccountAssociationRequest {
        accounts: vec!["physics".into()],
        options: AssociationOptions::new("main"),
    };
    let users = UserAssociationRequest {
        users: vec!["alice".into()],
        account: "physics".into(),
        options: AssociationOptions::new("main"),
    };

    for version in ApiVersion::ALL {
        let client = RecordingClient::new();
        let adapter = build(version.as_str(), client.clone()).unwrap();
        let notify = adapter.jobs().notify(&ctx, 7, "checkpoint").await;
        let account = adapter.accounts().create_association(&ctx, &accounts).await;
        let user = adapter.users().create_association(&ctx, &users).await;
        if version >= ApiVersion::V0043 {
            notify.unwrap();
            account.unwrap();
            user.unwrap();
            let sent = client.requests();
            assert_eq!(sent.len(), 3, "{version}");
            assert_eq!(sent[0].body.as_ref().unwrap()["comment"], "checkpoint");
            assert_eq!(sent[2].path, format!("/slurmdb/{}/associations", version.as_str()));
        } else {
            assert_not_implemented(&notify.unwrap_err(), version);
            assert_not_implemented(&account.unwrap_err(), version);
            assert_not_implemented(&user.unwrap_err(), version);
            assert!(client.requests().is_empty(), "{version}");
        }
    }
}

#[tokio::test]
async fn instances_on_odd_releases() {
    let ctx = RequestContext::new();
    for version in ApiVersion::ALL {
        let client = RecordingClient::new();
        let adapter = build(version.as_str(), client.clone()).unwrap();
        let result = adapter.standalone().instances(&ctx, None).await;
        if matches!(version, ApiVersion::V0041 | ApiVersion::V0043) {
            assert!(result.unwrap().is_empty(), "{version}");
            assert_eq!(client.requests().len(), 1, "{version}");
        } else {
            assert_not_implemented(&result.unwrap_err(), version);
            assert!(client.requests().is_empty(), "{version}");
        }
    }
}
