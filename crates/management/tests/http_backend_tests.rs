use httpmock::Method::{DELETE, GET, POST, PUT};
use httpmock::MockServer;
use objbroker_core::BucketQuota;
use objbroker_management::{
    BucketAcl, BucketCreate, HttpBackend, ManagementApi, ManagementError, UserAcl,
};
use serde_json::json;
use std::net::TcpListener;
use std::time::Duration;

const TOKEN: &str = "session-token";

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&server.base_url(), "root", "pw", Duration::from_secs(5)).unwrap()
}

fn mock_login(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/login")
            .header("authorization", "Basic cm9vdDpwdw==");
        then.status(200).header("X-SDS-AUTH-TOKEN", TOKEN);
    })
}

#[tokio::test]
async fn login_once_and_reuse_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let login = mock_login(&server);

    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/object/baseurl")
            .header("x-sds-auth-token", TOKEN);
        then.status(200).json_body(json!({
            "base_url": [
                {"id": "1", "name": "Other"},
                {"id": "2", "name": "DefaultBaseUrl"}
            ]
        }));
    });

    let info = server.mock(|when, then| {
        when.method(GET)
            .path("/object/baseurl/2")
            .header("x-sds-auth-token", TOKEN);
        then.status(200).json_body(json!({
            "id": "2",
            "name": "DefaultBaseUrl",
            "baseurl": "s3.example.com",
            "namespace_in_host": true
        }));
    });

    let backend = backend(&server);
    let urls = backend.list_base_urls().await.unwrap();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[1].name, "DefaultBaseUrl");

    let url = backend.get_base_url("2").await.unwrap();
    assert_eq!(url.baseurl, "s3.example.com");
    assert!(url.namespace_in_host);

    login.assert_hits(1);
    list.assert_hits(1);
    info.assert_hits(1);
}

#[tokio::test]
async fn rejected_login_is_auth_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/login");
        then.status(401).body("bad credentials");
    });

    let backend = backend(&server);
    assert!(matches!(
        backend.health_check().await,
        Err(ManagementError::Auth(_))
    ));
}

#[tokio::test]
async fn missing_token_header_is_auth_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/login");
        then.status(200);
    });

    let backend = backend(&server);
    assert!(matches!(
        backend.list_replication_groups().await,
        Err(ManagementError::Auth(_))
    ));
}

#[tokio::test]
async fn bucket_calls_use_management_paths() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    mock_login(&server);

    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/object/bucket")
            .header("x-sds-auth-token", TOKEN)
            .json_body(json!({
                "name": "ecs-cf-broker-b1",
                "namespace": "ns1",
                "vpool": "urn:rg1",
                "head_type": "s3",
                "filesystem_enabled": false,
                "is_stale_allowed": true
            }));
        then.status(200).json_body(json!({"id": "ns1.ecs-cf-broker-b1"}));
    });

    let quota = server.mock(|when, then| {
        when.method(PUT)
            .path("/object/bucket/ecs-cf-broker-b1/quota")
            .json_body(json!({
                "blockSize": 100,
                "notificationSize": 80,
                "namespace": "ns1"
            }));
        then.status(200);
    });

    let drop_quota = server.mock(|when, then| {
        when.method(DELETE)
            .path("/object/bucket/ecs-cf-broker-b1/quota")
            .query_param("namespace", "ns1");
        then.status(200);
    });

    let deactivate = server.mock(|when, then| {
        when.method(POST)
            .path("/object/bucket/ecs-cf-broker-b1/deactivate")
            .query_param("namespace", "ns1");
        then.status(200);
    });

    let backend = backend(&server);
    backend
        .create_bucket(&BucketCreate {
            name: "ecs-cf-broker-b1".to_string(),
            namespace: "ns1".to_string(),
            vpool: "urn:rg1".to_string(),
            head_type: "s3".to_string(),
            filesystem_enabled: false,
            is_stale_allowed: true,
        })
        .await
        .unwrap();
    backend
        .create_bucket_quota(
            "ecs-cf-broker-b1",
            "ns1",
            BucketQuota {
                limit: 100,
                warning: 80,
            },
        )
        .await
        .unwrap();
    backend
        .delete_bucket_quota("ecs-cf-broker-b1", "ns1")
        .await
        .unwrap();
    backend
        .delete_bucket("ecs-cf-broker-b1", "ns1")
        .await
        .unwrap();

    create.assert_hits(1);
    quota.assert_hits(1);
    drop_quota.assert_hits(1);
    deactivate.assert_hits(1);
}

#[tokio::test]
async fn bucket_probe_maps_404_to_false() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    mock_login(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/object/bucket/present/info")
            .query_param("namespace", "ns1");
        then.status(200).json_body(json!({
            "name": "present",
            "namespace": "ns1",
            "vpool": "urn:rg1",
            "block_size": 100,
            "notification_size": 80
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/object/bucket/absent/info")
            .query_param("namespace", "ns1");
        then.status(404).body("not found");
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/object/bucket/broken/info")
            .query_param("namespace", "ns1");
        then.status(500).body("boom");
    });

    let backend = backend(&server);
    assert!(backend.bucket_exists("present", "ns1").await.unwrap());
    assert!(!backend.bucket_exists("absent", "ns1").await.unwrap());

    let info = backend.get_bucket("present", "ns1").await.unwrap();
    assert_eq!((info.quota_limit, info.quota_warning), (100, 80));

    assert!(
        backend
            .get_bucket("absent", "ns1")
            .await
            .unwrap_err()
            .is_not_found()
    );

    match backend.bucket_exists("broken", "ns1").await {
        Err(ManagementError::Remote { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn user_and_secret_calls() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    mock_login(&server);

    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/object/users")
            .json_body(json!({"user": "ecs-cf-broker-u1", "namespace": "ns1"}));
        then.status(200);
    });
    let new_secret = server.mock(|when, then| {
        when.method(POST)
            .path("/object/user-secret-keys/ecs-cf-broker-u1")
            .json_body(json!({}));
        then.status(200).json_body(json!({
            "secret_key": "s3cr3t",
            "key_timestamp": "2016-01-01 00:00:00.000"
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/object/user-secret-keys/ecs-cf-broker-u1");
        then.status(200).json_body(json!({
            "secret_key_1": "s3cr3t",
            "key_timestamp_1": "2016-01-01 00:00:00.000",
            "secret_key_2": ""
        }));
    });
    let delete = server.mock(|when, then| {
        when.method(POST)
            .path("/object/users/deactivate")
            .json_body(json!({"user": "ecs-cf-broker-u1"}));
        then.status(200);
    });

    let backend = backend(&server);
    backend.create_user("ecs-cf-broker-u1", "ns1").await.unwrap();
    let key = backend
        .create_user_secret("ecs-cf-broker-u1")
        .await
        .unwrap();
    assert_eq!(key.secret_key, "s3cr3t");

    let keys = backend.list_user_secrets("ecs-cf-broker-u1").await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].secret_key, "s3cr3t");

    backend.delete_user("ecs-cf-broker-u1").await.unwrap();

    create.assert_hits(1);
    new_secret.assert_hits(1);
    delete.assert_hits(1);
}

#[tokio::test]
async fn acl_document_round_trips_through_api() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    mock_login(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/object/bucket/b1/acl")
            .query_param("namespace", "ns1");
        then.status(200).json_body(json!({
            "bucket": "b1",
            "namespace": "ns1",
            "acl": {"user_acl": [{"user": "u0", "permission": ["read"]}]}
        }));
    });
    let update = server.mock(|when, then| {
        when.method(PUT)
            .path("/object/bucket/b1/acl")
            .json_body(json!({
                "bucket": "b1",
                "namespace": "ns1",
                "acl": {
                    "user_acl": [
                        {"user": "u0", "permission": ["read"]},
                        {"user": "u1", "permission": ["full_control"]}
                    ],
                    "group_acl": [],
                    "customgroup_acl": []
                }
            }));
        then.status(200);
    });

    let backend = backend(&server);
    let mut acl: BucketAcl = backend.get_bucket_acl("b1", "ns1").await.unwrap();
    acl.acl
        .user_acl
        .push(UserAcl::new("u1", vec!["full_control".to_string()]));
    backend.update_bucket_acl("b1", &acl).await.unwrap();

    update.assert_hits(1);
}

#[tokio::test]
async fn logout_is_skipped_without_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let logout = server.mock(|when, then| {
        when.method(GET).path("/logout");
        then.status(200);
    });

    let backend = backend(&server);
    backend.logout().await.unwrap();
    logout.assert_hits(0);

    mock_login(&server);
    backend.health_check().await.unwrap();
    backend.logout().await.unwrap();
    logout.assert_hits(1);
}
