#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Pass,
    Fail,
}

/// Report sections, in the order they are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableKind {
    Type,
    Method,
    Event,
    Field,
    Property,
}

impl RenderableKind {
    pub const SECTIONS: [RenderableKind; 5] = [
        RenderableKind::Type,
        RenderableKind::Method,
        RenderableKind::Event,
        RenderableKind::Field,
        RenderableKind::Property,
    ];

    pub fn noun(self) -> &'static str {
        match self {
            RenderableKind::Type => "type",
            RenderableKind::Method => "method",
            RenderableKind::Event => "event",
            RenderableKind::Field => "field",
            RenderableKind::Property => "property",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableEntry {
    pub kind: RenderableKind,
    pub owner: String,
    pub signature: String,
    pub changed: bool,
    pub ignored: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableModule {
    pub platform: String,
    pub module: String,
    pub candidate_missing: bool,
    pub entries: Vec<RenderableEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderablePackage {
    pub id: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdict,
    pub baseline: Option<RenderablePackage>,
    pub candidate: Option<RenderablePackage>,
    pub modules: Vec<RenderableModule>,
    pub unmatched_platforms: Vec<String>,
    pub error: Option<String>,
}
