use enum_map::Enum;

/// One of the files the Orchestrator writes for a placement run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enum)]
pub enum DataKind {
    AppEdgeCosts,
    AppToHw,
    Diagnostics,
    HwEdgeLoading,
    HwToApp,
    NodeLoading,
}

impl DataKind {
    pub const ALL: [DataKind; 6] = [
        DataKind::AppEdgeCosts,
        DataKind::AppToHw,
        DataKind::Diagnostics,
        DataKind::HwEdgeLoading,
        DataKind::HwToApp,
        DataKind::NodeLoading,
    ];
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataKind::AppEdgeCosts => write!(f, "application edge costs"),
            DataKind::AppToHw => write!(f, "application to hardware mapping"),
            DataKind::Diagnostics => write!(f, "placement diagnostics"),
            DataKind::HwEdgeLoading => write!(f, "hardware edge loading"),
            DataKind::HwToApp => write!(f, "hardware to application mapping"),
            DataKind::NodeLoading => write!(f, "hardware node loading"),
        }
    }
}
