//! Whiteboard Session
//!
//! Ties the editor together: the canvas state, its render surface, the API
//! client, the list of saved drawings and the drawing currently being edited.
//! Network failures are logged and leave the session as it was; the
//! operations report success as a `bool` so callers can react if they want.

use tracing::{error, info, warn};
use whiteboard_core::{Drawing, DrawingId};

use crate::client::DrawingsClient;
use crate::config::CanvasConfig;
use crate::error::Result;
use crate::renderer::{Renderer, Surface};
use crate::state::{CanvasAction, CanvasState, Effect};

/// An editing session against the drawings API
pub struct Whiteboard {
    state: CanvasState,
    renderer: Renderer,
    surface: Surface,
    client: DrawingsClient,
    drawings: Vec<Drawing>,
    current_id: Option<DrawingId>,
}

impl Whiteboard {
    /// Create a session with an empty canvas
    pub fn new(config: &CanvasConfig, client: DrawingsClient) -> Result<Self> {
        Ok(Self {
            state: CanvasState::new(config),
            renderer: Renderer::new(config)?,
            surface: Surface::from_config(config)?,
            client,
            drawings: Vec::new(),
            current_id: None,
        })
    }

    /// Replace the renderer, e.g. one with a different font
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Apply a UI action and paint its effect
    pub fn dispatch(&mut self, action: CanvasAction) -> Effect {
        let effect = self.state.dispatch(action);
        self.renderer.apply(&mut self.surface, &self.state, &effect);
        effect
    }

    /// Save the canvas: create a drawing the first time, update it afterwards
    pub async fn save(&mut self) -> bool {
        if self.current_id.is_some() {
            return self.update().await;
        }

        match self.client.create(&self.state.snapshot()).await {
            Ok(drawing) => {
                info!(id = %drawing.id, "Drawing saved");
                self.current_id = Some(drawing.id);
                self.drawings.push(drawing);
                true
            }
            Err(e) => {
                error!(error = %e, "Error saving drawing");
                false
            }
        }
    }

    /// Push the canvas content to the current drawing and refresh the list
    pub async fn update(&mut self) -> bool {
        let Some(id) = self.current_id else {
            warn!("No drawing selected to update");
            return false;
        };

        match self.client.update(&id, &self.state.patch()).await {
            Ok(_) => {
                info!(%id, "Drawing updated");
                self.fetch_drawings().await;
                true
            }
            Err(e) => {
                error!(%id, error = %e, "Error updating drawing");
                false
            }
        }
    }

    /// Refresh the list of saved drawings; empty when the fetch fails
    pub async fn fetch_drawings(&mut self) -> bool {
        match self.client.list().await {
            Ok(drawings) => {
                self.drawings = drawings;
                true
            }
            Err(e) => {
                error!(error = %e, "Error fetching drawings");
                self.drawings.clear();
                false
            }
        }
    }

    /// Open a drawing for editing and repaint the canvas from it
    pub fn select(&mut self, drawing: Drawing) {
        self.current_id = Some(drawing.id);
        self.dispatch(CanvasAction::Load(drawing));
    }

    /// Delete a saved drawing and refresh the list
    pub async fn delete(&mut self, id: DrawingId) -> bool {
        match self.client.delete(&id).await {
            Ok(message) => {
                info!(%id, %message, "Drawing deleted");
                if self.current_id == Some(id) {
                    self.current_id = None;
                }
                self.fetch_drawings().await;
                true
            }
            Err(e) => {
                error!(%id, error = %e, "Error deleting drawing");
                false
            }
        }
    }

    /// Export the surface as PNG
    pub fn export_png(&self) -> Result<Vec<u8>> {
        self.surface.encode_png()
    }

    /// Canvas state
    #[must_use]
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Render surface
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Drawings from the last successful fetch or save
    #[must_use]
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    /// Drawing being edited, if it has been saved or selected
    #[must_use]
    pub fn current_id(&self) -> Option<DrawingId> {
        self.current_id
    }

    /// API client
    #[must_use]
    pub fn client(&self) -> &DrawingsClient {
        &self.client
    }
}
