//! Producer dispatch against a recording template
//!
//! Each test builds a message, runs it through `GraphProducer::process`, and
//! checks which template call was made and which id landed on the message.

mod common;

use common::{Call, RecordingTemplate};
use graphbridge::{
    BasicRelationship, Body, Entity, EntityClass, EntityRelationship, Exchange, GraphProducer,
    HeaderValue, Message, NodeId, Operation, ProducerError, Properties, PropertyValue,
    RelationshipId, StorageError, HEADER_NODE_ID, HEADER_OPERATION, HEADER_RELATIONSHIP_ID,
};

fn producer() -> GraphProducer<RecordingTemplate> {
    GraphProducer::new(RecordingTemplate::new(14, 99))
}

fn exchange(operation: Operation, body: impl Into<Body>) -> Exchange {
    Exchange::new(
        Message::new()
            .with_header(HEADER_OPERATION, operation)
            .with_body(body),
    )
}

#[test]
fn create_node_with_empty_body() {
    let producer = producer();
    let mut exchange = exchange(Operation::CreateNode, Body::Empty);

    producer.process(&mut exchange).unwrap();

    assert_eq!(producer.template().calls(), vec![Call::CreateNode]);
    assert_eq!(
        exchange.message().header(HEADER_NODE_ID),
        Some(&HeaderValue::Long(14))
    );
}

#[test]
fn create_node_with_properties_body() {
    let producer = producer();
    let mut props = Properties::new();
    props.insert("name".to_string(), PropertyValue::from("alice"));
    let mut exchange = exchange(Operation::CreateNode, props.clone());

    producer.process(&mut exchange).unwrap();

    assert_eq!(producer.template().calls(), vec![Call::CreateNodeWith(props)]);
    assert_eq!(
        exchange.message().header(HEADER_NODE_ID),
        Some(&HeaderValue::Long(14))
    );
}

#[test]
fn create_node_with_empty_property_map_uses_mapping_path() {
    let producer = producer();
    let mut exchange = exchange(Operation::CreateNode, Properties::new());

    producer.process(&mut exchange).unwrap();

    assert_eq!(
        producer.template().calls(),
        vec![Call::CreateNodeWith(Properties::new())]
    );
}

#[test]
fn create_relationship_with_basic_body() {
    let producer = producer();
    let start = NodeId::new(1);
    let end = NodeId::new(2);
    let mut exchange = exchange(
        Operation::CreateRelationship,
        BasicRelationship::new(start, end, "friendswith"),
    );

    producer.process(&mut exchange).unwrap();

    assert_eq!(
        producer.template().calls(),
        vec![Call::CreateRelationshipBetween {
            start,
            end,
            rel_type: "friendswith".to_string(),
            properties: None,
        }]
    );
    assert_eq!(
        exchange.message().header(HEADER_RELATIONSHIP_ID),
        Some(&HeaderValue::Long(99))
    );
    assert!(exchange.message().header(HEADER_NODE_ID).is_none());
}

#[test]
fn create_relationship_with_entity_body() {
    let producer = GraphProducer::new(RecordingTemplate::new(14, 55));
    let start = Entity::new(EntityClass::new("Person")).with_property("name", "alice");
    let end = Entity::new(EntityClass::new("Person")).with_property("name", "bob");
    let entity_class = EntityClass::new("Friendship");
    let mut exchange = exchange(
        Operation::CreateRelationship,
        EntityRelationship::new(
            start.clone(),
            end.clone(),
            entity_class.clone(),
            "friendswith",
            true,
        ),
    );

    producer.process(&mut exchange).unwrap();

    assert_eq!(
        producer.template().calls(),
        vec![Call::CreateEntityRelationshipBetween {
            start,
            end,
            entity_class,
            rel_type: "friendswith".to_string(),
            allow_duplicates: true,
        }]
    );
    assert_eq!(
        exchange.message().header(HEADER_RELATIONSHIP_ID),
        Some(&HeaderValue::Long(55))
    );
}

#[test]
fn missing_operation_fails_without_template_calls() {
    let producer = producer();
    let mut exchange = Exchange::new(Message::new());

    let err = producer.process(&mut exchange).unwrap_err();

    assert!(matches!(err, ProducerError::UnsupportedOperation(None)));
    assert!(producer.template().calls().is_empty());
    assert_eq!(exchange.message(), &Message::new());
}

#[test]
fn unknown_operation_code_fails() {
    let producer = producer();
    let mut exchange = Exchange::new(Message::new().with_header(HEADER_OPERATION, "MERGE_NODE"));

    let err = producer.process(&mut exchange).unwrap_err();

    assert!(matches!(err, ProducerError::UnsupportedOperation(Some(ref code)) if code == "MERGE_NODE"));
    assert!(producer.template().calls().is_empty());
}

#[test]
fn textual_operation_code_is_accepted() {
    let producer = producer();
    let mut exchange = Exchange::new(Message::new().with_header(HEADER_OPERATION, "CREATE_NODE"));

    producer.process(&mut exchange).unwrap();

    assert_eq!(producer.template().calls(), vec![Call::CreateNode]);
}

#[test]
fn wrong_body_shape_fails_before_template_call() {
    let producer = producer();
    let mut exchange = exchange(Operation::CreateRelationship, Properties::new());

    let err = producer.process(&mut exchange).unwrap_err();

    match err {
        ProducerError::InvalidBody { operation, found } => {
            assert_eq!(operation, Operation::CreateRelationship);
            assert_eq!(found, "properties");
        }
        other => panic!("expected InvalidBody, got {other:?}"),
    }
    assert!(producer.template().calls().is_empty());
    assert!(exchange.message().header(HEADER_RELATIONSHIP_ID).is_none());
}

#[test]
fn store_errors_surface_unchanged() {
    let producer = GraphProducer::new(RecordingTemplate::unavailable());
    let mut exchange = exchange(Operation::CreateNode, Body::Empty);

    let err = producer.process(&mut exchange).unwrap_err();

    match err {
        ProducerError::Store(StorageError::Io(e)) => assert_eq!(e.to_string(), "store unavailable"),
        other => panic!("expected store error, got {other:?}"),
    }
    assert_eq!(producer.template().calls(), vec![Call::CreateNode]);
    assert!(exchange.message().header(HEADER_NODE_ID).is_none());
}

#[test]
fn remove_node_by_id() {
    let producer = producer();
    let mut exchange = exchange(Operation::RemoveNode, NodeId::new(3));

    producer.process(&mut exchange).unwrap();

    assert_eq!(producer.template().calls(), vec![Call::DeleteNode(NodeId::new(3))]);
    assert_eq!(
        exchange.message().header(HEADER_NODE_ID),
        Some(&HeaderValue::Long(3))
    );
}

#[test]
fn remove_relationship_by_id_and_by_description() {
    let producer = producer();

    let mut by_id = exchange(Operation::RemoveRelationship, RelationshipId::new(8));
    producer.process(&mut by_id).unwrap();
    assert_eq!(
        by_id.message().header(HEADER_RELATIONSHIP_ID),
        Some(&HeaderValue::Long(8))
    );

    let mut by_description = exchange(
        Operation::RemoveRelationship,
        BasicRelationship::new(NodeId::new(1), NodeId::new(2), "knows"),
    );
    producer.process(&mut by_description).unwrap();
    assert_eq!(
        by_description.message().header(HEADER_RELATIONSHIP_ID),
        Some(&HeaderValue::Long(99))
    );

    assert_eq!(
        producer.template().calls(),
        vec![
            Call::DeleteRelationship(RelationshipId::new(8)),
            Call::DeleteRelationshipBetween {
                start: NodeId::new(1),
                end: NodeId::new(2),
                rel_type: "knows".to_string(),
            },
        ]
    );
}

#[test]
fn dispatch_is_not_idempotent_by_contract() {
    // Each dispatch reaches the template; nothing is cached between calls.
    let producer = producer();
    for _ in 0..2 {
        let mut exchange = exchange(Operation::CreateNode, Body::Empty);
        producer.process(&mut exchange).unwrap();
    }
    assert_eq!(producer.template().calls(), vec![Call::CreateNode, Call::CreateNode]);
}
