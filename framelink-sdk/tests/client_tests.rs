use framelink_sdk::mock::MockHost;
use framelink_sdk::{Client, EntityInfo, HostNotification, Ports, SdkError, User};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

async fn connect(host: &Arc<MockHost>) -> Client {
    Client::connect(host.clone()).await.unwrap()
}

#[tokio::test]
async fn connect_caches_the_current_user() {
    let host = Arc::new(MockHost::new().with_user(User::new("u1").with_name("Ada")));
    let client = connect(&host).await;

    assert_eq!(client.user(), Some(&User::new("u1").with_name("Ada")));
    // No second host call for repeated reads.
    assert_eq!(client.user().unwrap().id, "u1");
}

#[tokio::test]
async fn connect_without_a_user_is_fine() {
    let host = Arc::new(MockHost::new());
    let client = connect(&host).await;
    assert_eq!(client.user(), None);
}

#[tokio::test]
async fn field_set_waits_for_the_echo() {
    let host = Arc::new(MockHost::new());
    host.insert_field(EntityInfo::with_value("score", "1"));
    let client = connect(&host).await;

    let score = client.field("score", json!(0)).await.unwrap();
    let seen: Arc<Mutex<Vec<(Value, String)>>> = Arc::default();
    let sink = Arc::clone(&seen);
    score.on_set(move |value, user| {
        sink.lock().unwrap().push((value.clone(), user.to_owned()));
    });

    score.set(&json!(2)).await.unwrap();
    // Host accepted, but the local cache only moves on the echo.
    assert_eq!(score.value(), json!(1));
    assert!(seen.lock().unwrap().is_empty());

    client
        .deliver(HostNotification::SetFieldValue {
            id: "score".into(),
            user_id: "u1".into(),
            value: "2".into(),
        })
        .await;

    assert_eq!(score.value(), json!(2));
    assert_eq!(seen.lock().unwrap().as_slice(), [(json!(2), "u1".to_owned())]);
}

#[tokio::test]
async fn undecodable_echo_is_swallowed() {
    let host = Arc::new(MockHost::new());
    host.insert_field(EntityInfo::with_value("score", "1"));
    let client = connect(&host).await;
    let score = client.field("score", json!(0)).await.unwrap();

    client
        .deliver(HostNotification::SetFieldValue {
            id: "score".into(),
            user_id: "u1".into(),
            value: "not json".into(),
        })
        .await;

    assert_eq!(score.value(), json!(1));
}

#[tokio::test]
async fn valueless_field_is_seeded_with_the_fallback() {
    let host = Arc::new(MockHost::new());
    host.insert_field(EntityInfo::new("flag"));
    let client = connect(&host).await;

    let flag = client.field("flag", json!(false)).await.unwrap();
    assert_eq!(flag.value(), json!(false));

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(host.set_count("flag"), 1);
}

#[tokio::test]
async fn pending_field_resolves_on_creation_push() {
    let host = Arc::new(MockHost::new());
    let client = Arc::new(connect(&host).await);

    let pusher = Arc::clone(&client);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        pusher
            .deliver(HostNotification::CreateField(EntityInfo::with_value(
                "score", "0",
            )))
            .await;
    });

    let score = client.field("score", json!(-1)).await.unwrap();
    assert_eq!(score.value(), json!(0));
}

#[tokio::test]
async fn field_deletion_retires_the_handle() {
    let host = Arc::new(MockHost::new());
    host.insert_field(EntityInfo::with_value("score", "1"));
    let client = connect(&host).await;
    let score = client.field("score", json!(0)).await.unwrap();

    client
        .deliver(HostNotification::DeleteField { id: "score".into() })
        .await;

    assert!(score.deleted());
    assert!(matches!(
        score.set(&json!(2)).await,
        Err(SdkError::Deleted(_))
    ));
}

#[tokio::test]
async fn broadcasts_route_to_the_cached_handle() {
    let host = Arc::new(MockHost::new());
    host.insert_broadcaster(EntityInfo::new("chat"));
    let client = connect(&host).await;

    let chat = client.broadcaster("chat").await.unwrap();
    let seen: Arc<Mutex<Vec<(String, Vec<Value>)>>> = Arc::default();
    let sink = Arc::clone(&seen);
    chat.on("message", move |event, args| {
        sink.lock().unwrap().push((event.to_owned(), args.to_vec()));
    });

    client
        .deliver(HostNotification::Broadcast {
            id: "chat".into(),
            user_id: "u2".into(),
            message: r#"["message","hi"]"#.into(),
        })
        .await;

    // An uncached id and a malformed payload are both dropped silently.
    client
        .deliver(HostNotification::Broadcast {
            id: "other".into(),
            user_id: "u2".into(),
            message: r#"["message"]"#.into(),
        })
        .await;
    client
        .deliver(HostNotification::Broadcast {
            id: "chat".into(),
            user_id: "u2".into(),
            message: "garbage".into(),
        })
        .await;

    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [("message".to_owned(), vec![json!("u2"), json!("hi")])]
    );
}

#[tokio::test]
async fn plugin_messages_route_to_the_cached_handle() {
    let host = Arc::new(MockHost::new());
    host.insert_plugin(EntityInfo::new("peer"));
    let client = connect(&host).await;

    let peer = client.plugin("peer").await.unwrap();
    let seen: Arc<Mutex<Vec<Vec<Value>>>> = Arc::default();
    let sink = Arc::clone(&seen);
    peer.on("pong", move |_event, args| {
        sink.lock().unwrap().push(args.to_vec());
    });

    client
        .deliver(HostNotification::PluginMessage {
            id: "peer".into(),
            message: r#"["pong",7]"#.into(),
        })
        .await;

    assert_eq!(seen.lock().unwrap().as_slice(), [vec![json!(7)]]);
}

#[tokio::test]
async fn bulk_lookups_share_the_cache() {
    let host = Arc::new(MockHost::new());
    host.insert_field(EntityInfo::with_value("a", "1"));
    host.insert_field(EntityInfo::with_value("b", "2"));
    let client = connect(&host).await;

    let a = client.field("a", json!(0)).await.unwrap();
    let all = client.fields(|_| json!(0)).await.unwrap();

    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|field| Arc::ptr_eq(field, &a)));

    let broadcasters = client.broadcasters().await.unwrap();
    assert!(broadcasters.is_empty());
}

#[tokio::test]
async fn ports_reflect_registration() {
    let host = Arc::new(MockHost::new());
    let client = connect(&host).await;

    client.add_field_port("score");
    client.add_field_port("score"); // duplicate
    client.add_broadcaster_port("chat");
    client.add_plugin_port("peer");
    client.remove_plugin_port("peer");

    assert_eq!(
        client.ports(),
        Ports::new(
            vec!["score".to_owned()],
            vec!["chat".to_owned()],
            Vec::new(),
        )
    );

    client.remove_field_port("score");
    client.remove_broadcaster_port("chat");
    assert!(client.ports().is_empty());
}

#[tokio::test]
async fn fetch_user_asks_the_host() {
    let host = Arc::new(MockHost::new().with_user(User::new("u1")));
    let client = connect(&host).await;

    assert_eq!(client.fetch_user("u1").await.unwrap(), Some(User::new("u1")));
    assert_eq!(client.fetch_user("ghost").await.unwrap(), None);
}
