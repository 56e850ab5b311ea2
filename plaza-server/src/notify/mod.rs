//! Notification Module
//!
//! Event fan-out to delivery channels. The [`NotificationService`]
//! renders templates and persists one record per (recipient, channel),
//! then hands dispatch jobs to the [`DispatchWorker`] over an mpsc
//! channel; the worker drives the [`DeliveryChannel`] implementations
//! and records the outcome.

mod channel;
mod renderer;
mod service;
mod worker;

pub use channel::{ChannelError, DeliveryChannel, EmailChannel, PushChannel, SmsChannel, default_channels};
pub use renderer::{builtin_template, render};
pub use service::{DispatchJob, NotificationService, booking_context, tenant_context};
pub use worker::DispatchWorker;
