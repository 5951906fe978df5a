//! Pure routing of rumqttc events
//!
//! The event-loop driver only cares about a handful of packets: CONNACK,
//! the outgoing PUBLISH and the acknowledgements that complete QoS 1 and
//! QoS 2 deliveries. Everything else is logged and ignored.

use rumqttc::{Event, Outgoing, Packet};

/// Pure message routing decisions based on MQTT events
pub struct MessageHandler;

impl MessageHandler {
    /// Route MQTT event to appropriate handler (pure routing decision)
    pub fn route_mqtt_event(event: &Event) -> EventRoute {
        match event {
            Event::Incoming(incoming) => match incoming {
                Packet::ConnAck(_) => EventRoute::ConnectionAcknowledged,
                Packet::PubAck(ack) => EventRoute::PublishAcknowledged { pkid: ack.pkid },
                Packet::PubRec(rec) => EventRoute::PublishReceived { pkid: rec.pkid },
                Packet::PubComp(comp) => EventRoute::PublishCompleted { pkid: comp.pkid },
                Packet::PingResp => EventRoute::KeepAlive,
                Packet::Disconnect => EventRoute::Disconnected,
                other => EventRoute::InfrastructureEvent(format!("{other:?}")),
            },
            Event::Outgoing(outgoing) => match outgoing {
                Outgoing::Publish(pkid) => EventRoute::PublishSent { pkid: *pkid },
                Outgoing::PingReq => EventRoute::KeepAlive,
                Outgoing::Disconnect => EventRoute::ClientDisconnecting,
                other => EventRoute::InfrastructureEvent(format!("{other:?}")),
            },
        }
    }

    /// Delivery progress carried by a route, if any
    pub fn delivery_event(route: &EventRoute) -> Option<DeliveryEvent> {
        match route {
            EventRoute::PublishSent { pkid } => Some(DeliveryEvent::Sent(*pkid)),
            EventRoute::PublishAcknowledged { pkid } => Some(DeliveryEvent::Acknowledged(*pkid)),
            EventRoute::PublishReceived { pkid } => Some(DeliveryEvent::Received(*pkid)),
            EventRoute::PublishCompleted { pkid } => Some(DeliveryEvent::Completed(*pkid)),
            _ => None,
        }
    }
}

/// Routing decisions for MQTT events
#[derive(Debug, Clone, PartialEq)]
pub enum EventRoute {
    /// Connection acknowledged - ready to publish
    ConnectionAcknowledged,
    /// PUBLISH packet written to the network
    PublishSent { pkid: u16 },
    /// PUBACK received (QoS 1 complete)
    PublishAcknowledged { pkid: u16 },
    /// PUBREC received (QoS 2 first half)
    PublishReceived { pkid: u16 },
    /// PUBCOMP received (QoS 2 complete)
    PublishCompleted { pkid: u16 },
    /// Ping request or response
    KeepAlive,
    /// MQTT broker disconnected
    Disconnected,
    /// Our own DISCONNECT went out
    ClientDisconnecting,
    /// Infrastructure events (logged only)
    InfrastructureEvent(String),
}

/// Publish progress broadcast from the event loop to waiting publishers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryEvent {
    Sent(u16),
    Acknowledged(u16),
    Received(u16),
    Completed(u16),
}
