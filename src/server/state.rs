use std::sync::Arc;

use crate::caption::CaptionRenderer;
use crate::settings;

#[derive(Clone)]
pub struct ServerState {
    pub(crate) settings: settings::Settings,
    pub(crate) renderer: Arc<CaptionRenderer>,
}

impl ServerState {
    pub fn new(settings: settings::Settings, renderer: CaptionRenderer) -> Self {
        Self {
            settings,
            renderer: Arc::new(renderer),
        }
    }
}
