//! Sensor drivers.
//!
//! Every shield service is exposed as a sensor. A sensor owns a small amount
//! of generic event state in [`Sensor`] and adds its own fields on top, the
//! way [`web::Web`] keeps the last web response.
//!
//! Sensors work in one of two modes:
//!
//! - **Blocking**: with no event handler registered, a request does not return
//!   until the shield has answered it.
//! - **Callback**: with an [`EventHandler`] registered, a request returns its
//!   message id right away and the answer is delivered to the handler when the
//!   application polls the sensor.

#![deny(unsafe_code)]

use crate::protocol::{MessageId, ShieldEvent};
use core::fmt;

pub mod split;
pub mod web;

pub use web::Web;

/// Callback invoked for each event delivered to a sensor.
pub type EventHandler = fn(&ShieldEvent<'_>);

/// Generic event state shared by all sensors.
#[derive(Clone, Copy)]
pub struct Sensor {
    sensor_type: char,
    on_event: Option<EventHandler>,
    is_updated: bool,
    last_id: MessageId,
}

impl Sensor {
    /// Creates the state for a sensor of the given type.
    pub fn new(sensor_type: char) -> Self {
        Self {
            sensor_type,
            on_event: None,
            is_updated: false,
            last_id: 0,
        }
    }

    /// Single character identifying the kind of sensor.
    pub fn sensor_type(&self) -> char {
        self.sensor_type
    }

    /// Registers or clears the event handler.
    pub fn set_on_event(&mut self, handler: Option<EventHandler>) {
        self.on_event = handler;
    }

    /// Returns `true` if requests should return without waiting.
    pub fn has_handler(&self) -> bool {
        self.on_event.is_some()
    }

    /// Returns `true` if an event arrived since the flag was last cleared.
    pub fn is_updated(&self) -> bool {
        self.is_updated
    }

    /// Returns the updated flag and clears it.
    pub fn take_updated(&mut self) -> bool {
        core::mem::take(&mut self.is_updated)
    }

    /// Id of the last event delivered to this sensor.
    pub fn last_id(&self) -> MessageId {
        self.last_id
    }

    /// Generic processing of an event addressed to this sensor.
    pub fn on_json_received(&mut self, event: &ShieldEvent<'_>) {
        self.is_updated = true;
        self.last_id = event.id;
        if let Some(handler) = self.on_event {
            handler(event);
        }
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("sensor_type", &self.sensor_type)
            .field("has_handler", &self.has_handler())
            .field("is_updated", &self.is_updated)
            .field("last_id", &self.last_id)
            .finish()
    }
}
