// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw samples, normalized events, and the normalization step between them.
//!
//! Platform layers report contacts with whatever fields they have. A
//! [`RawSample`] keeps every field optional so a missing one can be detected;
//! [`Event::try_from_raw`] turns it into an [`Event`] or explains why it
//! cannot.
//!
//! ```
//! use quill_input::{Event, MalformedReason, Phase, PointerKind, RawSample, TouchId};
//!
//! let raw = RawSample::new(PointerKind::Pencil, Phase::Began, 12.0, 30.0, 1_000).with_pressure(0.4);
//! let event = Event::try_from_raw(TouchId(1), &raw).unwrap();
//! assert_eq!(event.phase, Phase::Began);
//! assert_eq!(event.pressure, Some(0.4));
//!
//! let missing = RawSample { phase: None, ..raw };
//! let err = Event::try_from_raw(TouchId(1), &missing).unwrap_err();
//! assert_eq!(err.reason, MalformedReason::MissingPhase);
//! ```

use kurbo::Point;

use crate::types::{Phase, PointerKind, TouchId};

/// One normalized input sample.
///
/// Events are produced by normalization and never mutated afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Event {
    /// What produced the sample.
    pub kind: PointerKind,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Contact identifier.
    pub id: TouchId,
    /// Position in surface coordinates.
    pub position: Point,
    /// Normalized force, if the device reports one.
    pub pressure: Option<f64>,
    /// Milliseconds on the input source's clock.
    pub timestamp: u64,
}

impl Event {
    /// Build an event directly, for hosts that already normalize.
    pub fn new(kind: PointerKind, phase: Phase, id: TouchId, position: Point, timestamp: u64) -> Self {
        Self {
            kind,
            phase,
            id,
            position,
            pressure: None,
            timestamp,
        }
    }

    /// Attach a pressure reading.
    #[must_use]
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Normalize a raw sample reported for `id`.
    ///
    /// Rules:
    /// - `kind`, `phase`, and `timestamp` are required.
    /// - Coordinates must be finite.
    /// - `pressure` falls back to `radius` when only a contact radius is
    ///   reported; whichever is used must be finite.
    pub fn try_from_raw(id: TouchId, raw: &RawSample) -> Result<Self, MalformedEvent> {
        let malformed = |reason| MalformedEvent { id, reason };
        let kind = raw.kind.ok_or(malformed(MalformedReason::MissingKind))?;
        let phase = raw.phase.ok_or(malformed(MalformedReason::MissingPhase))?;
        let timestamp = raw
            .timestamp
            .ok_or(malformed(MalformedReason::MissingTimestamp))?;
        if !raw.x.is_finite() || !raw.y.is_finite() {
            return Err(malformed(MalformedReason::NonFinitePosition));
        }
        let pressure = raw.pressure.or(raw.radius);
        if pressure.is_some_and(|p| !p.is_finite()) {
            return Err(malformed(MalformedReason::NonFinitePressure));
        }
        Ok(Self {
            kind,
            phase,
            id,
            position: Point::new(raw.x, raw.y),
            pressure,
            timestamp,
        })
    }
}

/// A sample as reported by a platform layer, before normalization.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RawSample {
    /// What produced the sample.
    pub kind: Option<PointerKind>,
    /// Lifecycle phase.
    pub phase: Option<Phase>,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Force, when the device reports one.
    pub pressure: Option<f64>,
    /// Contact radius, when the device reports one.
    pub radius: Option<f64>,
    /// Milliseconds on the input source's clock.
    pub timestamp: Option<u64>,
}

impl RawSample {
    /// A complete sample with no pressure or radius.
    pub fn new(kind: PointerKind, phase: Phase, x: f64, y: f64, timestamp: u64) -> Self {
        Self {
            kind: Some(kind),
            phase: Some(phase),
            x,
            y,
            pressure: None,
            radius: None,
            timestamp: Some(timestamp),
        }
    }

    /// Attach a pressure reading.
    #[must_use]
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Attach a contact radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }
}

/// Why a raw sample could not be normalized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MalformedReason {
    /// No pointer kind.
    MissingKind,
    /// No phase.
    MissingPhase,
    /// No timestamp.
    MissingTimestamp,
    /// `x` or `y` is NaN or infinite.
    NonFinitePosition,
    /// Pressure (or the radius standing in for it) is NaN or infinite.
    NonFinitePressure,
}

impl core::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::MissingKind => "missing pointer kind",
            Self::MissingPhase => "missing phase",
            Self::MissingTimestamp => "missing timestamp",
            Self::NonFinitePosition => "non-finite position",
            Self::NonFinitePressure => "non-finite pressure",
        })
    }
}

/// A raw sample that could not be normalized. The sample is dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed sample for touch {id}: {reason}")]
pub struct MalformedEvent {
    /// The contact the sample was reported for.
    pub id: TouchId,
    /// What was wrong with it.
    pub reason: MalformedReason,
}
