//! Background task driving the rumqttc event loop.

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS};
use tokio::sync::watch;

use haspbridge_app::ports::EventPublisher;
use haspbridge_app::services::dispatcher::MessageDispatcher;

use crate::session::{self, SessionStatus};

/// Poll `eventloop` forever, feeding publishes to `dispatcher`.
///
/// rumqttc reconnects on the next poll after an error, so errors only pause
/// the loop for `reconnect_delay`. Connection and subscription outcomes are
/// recorded in `status`.
pub(crate) async fn run<EP>(
    mut eventloop: EventLoop,
    client: AsyncClient,
    dispatcher: Arc<MessageDispatcher<EP>>,
    status: watch::Sender<SessionStatus>,
    reconnect_delay: Duration,
) where
    EP: EventPublisher + Send + Sync + 'static,
{
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let topic: &[u8] = publish.topic.as_ref();
                match std::str::from_utf8(topic) {
                    Ok(topic) => {
                        dispatcher.dispatch(topic, &publish.payload).await;
                    }
                    Err(err) => tracing::warn!(error = %err, "dropping publish with non UTF-8 topic"),
                }
            }
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                tracing::info!(session_present = ack.session_present, "MQTT connected");
                let mut plan = Vec::new();
                status.send_modify(|current| {
                    plan = session::restore_plan(current, ack.session_present, &dispatcher);
                });
                if !plan.is_empty() {
                    resubscribe(&client, &plan);
                }
            }
            Ok(Event::Incoming(Packet::SubAck(ack))) => {
                let mut refused = 0;
                status.send_modify(|current| refused = current.on_suback(&ack.return_codes));
                if refused > 0 {
                    tracing::error!(pkid = ack.pkid, refused, "broker refused subscription");
                } else {
                    tracing::debug!(pkid = ack.pkid, "subscription granted");
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, retry_in_secs = reconnect_delay.as_secs(), "MQTT connection error");
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}

/// Queue a subscription for every filter without blocking the event loop.
fn resubscribe(client: &AsyncClient, filters: &[&str]) {
    for filter in filters {
        if let Err(err) = client.try_subscribe(*filter, QoS::AtMostOnce) {
            tracing::error!(%filter, error = %err, "failed to resubscribe");
        }
    }
    tracing::info!(filters = filters.len(), "panel subscriptions restored");
}
