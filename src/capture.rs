//! Photo capture pipeline: file → decode → crop → canonical photo.
//!
//! ```text
//! Idle ──select──▶ Selecting ──decode──▶ Cropping ──confirm──▶ Ready
//!   ▲                  │                    │                    │
//!   └──────cancel──────┴────────────────────┘      select(new) ──┘ (previous photo discarded)
//! ```
//!
//! Decoding and cropping are the two suspension points. Each run holds a
//! [`Ticket`]; selecting a new file or cancelling supersedes it, and any step
//! that arrives with a stale ticket fails with [`CaptureError::Superseded`]
//! without touching state. Selecting with no file is a no-op.

use crate::imaging::{CropRequest, CropTool, ImagingError, decode_image};
use crate::session::{Generation, Ticket};
use image::{DynamicImage, RgbImage};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture step belongs to a superseded run")]
    Superseded,
    #[error("capture step not valid while {0}")]
    InvalidState(&'static str),
    #[error(transparent)]
    Imaging(#[from] ImagingError),
}

/// The cropped, canonical-size photo. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    image: RgbImage,
}

impl Photo {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Where the pipeline currently is.
#[derive(Debug)]
pub enum CaptureState {
    Idle,
    Selecting { ticket: Ticket, bytes: Vec<u8> },
    Cropping { ticket: Ticket, source: DynamicImage },
    Ready(Photo),
}

impl CaptureState {
    pub fn name(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Selecting { .. } => "selecting",
            CaptureState::Cropping { .. } => "cropping",
            CaptureState::Ready(_) => "ready",
        }
    }
}

/// Drives one photo at a time through selection, decoding and cropping.
pub struct CapturePipeline<C: CropTool> {
    crop_tool: C,
    request: CropRequest,
    generation: Generation,
    state: CaptureState,
}

impl<C: CropTool> CapturePipeline<C> {
    pub fn new(crop_tool: C) -> Self {
        Self::with_request(crop_tool, CropRequest::passport())
    }

    pub fn with_request(crop_tool: C, request: CropRequest) -> Self {
        Self {
            crop_tool,
            request,
            generation: Generation::new(),
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// The current photo, present only in `Ready`.
    pub fn photo(&self) -> Option<&Photo> {
        match &self.state {
            CaptureState::Ready(photo) => Some(photo),
            _ => None,
        }
    }

    /// Start a run with the chosen file. `None` (nothing chosen) is a no-op.
    ///
    /// Any previous photo or in-flight run is discarded.
    pub fn select(&mut self, file: Option<Vec<u8>>) -> Option<Ticket> {
        let bytes = file?;
        let ticket = self.generation.begin();
        debug!(
            ticket = ticket.id(),
            from = self.state.name(),
            bytes = bytes.len(),
            "capture: file selected"
        );
        self.state = CaptureState::Selecting { ticket, bytes };
        Some(ticket)
    }

    /// Decode the selected file and hand it to the crop step.
    ///
    /// A decode failure returns the pipeline to `Idle`.
    pub fn decode(&mut self, ticket: Ticket) -> Result<(), CaptureError> {
        self.check_current(ticket)?;
        let bytes = match std::mem::replace(&mut self.state, CaptureState::Idle) {
            CaptureState::Selecting { bytes, .. } => bytes,
            other => {
                let name = other.name();
                self.state = other;
                return Err(CaptureError::InvalidState(name));
            }
        };
        let source = decode_image(&bytes)?;
        debug!(
            ticket = ticket.id(),
            width = source.width(),
            height = source.height(),
            "capture: decoded, awaiting crop"
        );
        self.state = CaptureState::Cropping { ticket, source };
        Ok(())
    }

    /// Confirm the crop, producing the canonical photo.
    ///
    /// A crop failure leaves the pipeline in `Cropping` so the user can retry
    /// or cancel.
    pub fn confirm_crop(&mut self, ticket: Ticket) -> Result<&Photo, CaptureError> {
        self.check_current(ticket)?;
        let source = match &self.state {
            CaptureState::Cropping { source, .. } => source,
            other => return Err(CaptureError::InvalidState(other.name())),
        };
        let cropped = self.crop_tool.crop(source, &self.request)?;
        debug!(
            ticket = ticket.id(),
            width = cropped.width(),
            height = cropped.height(),
            "capture: photo ready"
        );
        self.state = CaptureState::Ready(Photo::new(cropped));
        self.photo().ok_or(CaptureError::InvalidState("idle"))
    }

    /// Abandon the current run and return to `Idle`, discarding any partial image.
    pub fn cancel(&mut self) {
        self.generation.cancel();
        if !matches!(self.state, CaptureState::Idle) {
            debug!(from = self.state.name(), "capture: cancelled");
        }
        self.state = CaptureState::Idle;
    }

    /// Run a whole capture synchronously: select, decode, confirm.
    pub fn capture(&mut self, file: Option<Vec<u8>>) -> Result<Option<&Photo>, CaptureError> {
        let Some(ticket) = self.select(file) else {
            return Ok(None);
        };
        self.decode(ticket)?;
        self.confirm_crop(ticket).map(Some)
    }

    fn check_current(&self, ticket: Ticket) -> Result<(), CaptureError> {
        if self.generation.is_current(ticket) {
            Ok(())
        } else {
            warn!(ticket = ticket.id(), "capture: dropping superseded step");
            Err(CaptureError::Superseded)
        }
    }
}
