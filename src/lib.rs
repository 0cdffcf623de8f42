//! # virtualshield - web requests through a shield coprocessor
//!
//! A `no_std` driver for hosts that reach the internet through a companion
//! coprocessor (a "virtual shield", typically a phone or a Wi-Fi module
//! attached over a serial link). The host sends small JSON commands describing
//! a web Get or Post; the shield performs the request, optionally extracts
//! fields from the page, and sends back a single `|`-delimited string.
//!
//! ## Layers
//!
//! - **[`network`]**: byte-stream traits the link is built on
//! - **[`protocol`]**: command records, wire vocabulary and incoming events
//! - **[`shield`]**: the [`Transport`](shield::Transport) seam and its serial
//!   implementation [`Shield`](shield::Shield)
//! - **[`sensor`]**: sensor drivers, currently the [`Web`](sensor::Web) sensor
//!
//! ## Usage
//!
//! ```rust,no_run
//! use virtualshield::sensor::Web;
//! use virtualshield::shield::Shield;
//! # use virtualshield::network::Connection;
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl virtualshield::network::Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl virtualshield::network::Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl virtualshield::network::Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! let connection = MockConnection;
//! let web = Web::new(Shield::new(connection));
//!
//! // Blocks until the shield answers.
//! // web.get("http://example.com/forecast", "//high|//low", 32)?;
//!
//! for _part in web.parts() {
//!     // "21", "12", ...
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Log through `defmt` and implement `defmt::Format` for errors
//! - `log`: Log through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Byte-stream abstraction for the link to the shield.
pub mod network;

/// Wire format of commands and events.
pub mod protocol;

/// Transport seam and the serial shield implementation.
pub mod shield;

/// Sensor drivers.
pub mod sensor;
