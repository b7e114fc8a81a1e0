//! What the upload surface shows for a given controller state.

use crate::client::AnalysisClient;
use crate::controller::UploadController;
use crate::report::{self, Report};

pub const CHOOSE_FILE_LABEL: &str = "Escolher arquivo";
pub const ANALYZE_LABEL: &str = "Analisar Arquivo";
pub const ANALYZING_LABEL: &str = "Analisando...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub file_label: String,
    pub trigger_label: &'static str,
    pub trigger_enabled: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub report: Option<Report>,
}

impl<C: AnalysisClient> From<&UploadController<C>> for WidgetView {
    fn from(controller: &UploadController<C>) -> Self {
        let loading = controller.is_loading();

        Self {
            file_label: controller
                .selected()
                .map(|file| file.name().to_string())
                .unwrap_or_else(|| CHOOSE_FILE_LABEL.to_string()),
            trigger_label: if loading { ANALYZING_LABEL } else { ANALYZE_LABEL },
            trigger_enabled: controller.can_submit(),
            loading,
            error: controller.error().map(|state| state.message.clone()),
            report: controller.result().map(report::render),
        }
    }
}
