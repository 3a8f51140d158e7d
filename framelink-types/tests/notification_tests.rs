use framelink_types::{EntityInfo, HostNotification};
use pretty_assertions::assert_eq;

#[test]
fn entity_id_covers_every_variant() {
    let info = EntityInfo::new("score");
    let cases = [
        HostNotification::SetFieldValue {
            id: "score".into(),
            user_id: "u1".into(),
            value: "1".into(),
        },
        HostNotification::Broadcast {
            id: "score".into(),
            user_id: "u1".into(),
            message: "[]".into(),
        },
        HostNotification::PluginMessage {
            id: "score".into(),
            message: "[]".into(),
        },
        HostNotification::CreateField(info.clone()),
        HostNotification::DeleteField { id: "score".into() },
        HostNotification::CreateBroadcaster(info.clone()),
        HostNotification::DeleteBroadcaster { id: "score".into() },
        HostNotification::CreatePlugin(info),
        HostNotification::DeletePlugin { id: "score".into() },
    ];

    for case in cases {
        assert_eq!(case.entity_id(), "score");
    }
}

#[test]
fn tagged_wire_shape() {
    let note = HostNotification::SetFieldValue {
        id: "score".into(),
        user_id: "u1".into(),
        value: "42".into(),
    };
    let json = serde_json::to_value(&note).unwrap();

    assert_eq!(json["kind"], "setFieldValue");
    assert_eq!(json["userId"], "u1");

    let back: HostNotification = serde_json::from_value(json).unwrap();
    assert_eq!(back, note);
}
