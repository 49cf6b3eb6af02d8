use std::{fmt, str::FromStr};

/// A named position in the pipeline of a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Init,
    PreAuth,
    Auth,
    PostAuth,
    PreDataLoad,
    PostDataLoad,
    PreUpdate,
    PostUpdate,
    PreSubscribe,
    Finish,
}

impl Slot {
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Init => "init",
            Slot::PreAuth => "preAuth",
            Slot::Auth => "auth",
            Slot::PostAuth => "postAuth",
            Slot::PreDataLoad => "preDataLoad",
            Slot::PostDataLoad => "postDataLoad",
            Slot::PreUpdate => "preUpdate",
            Slot::PostUpdate => "postUpdate",
            Slot::PreSubscribe => "preSubscribe",
            Slot::Finish => "finish",
        }
    }
}

impl AsRef<str> for Slot {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "init" => Slot::Init,
            "preAuth" => Slot::PreAuth,
            "auth" => Slot::Auth,
            "postAuth" => Slot::PostAuth,
            "preDataLoad" => Slot::PreDataLoad,
            "postDataLoad" => Slot::PostDataLoad,
            "preUpdate" => Slot::PreUpdate,
            "postUpdate" => Slot::PostUpdate,
            "preSubscribe" => Slot::PreSubscribe,
            "finish" => Slot::Finish,
            _ => return Err(()),
        })
    }
}

/// The root operation a resolver is attached to, which decides its slot layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn request_slots(self) -> &'static [Slot] {
        match self {
            OperationKind::Query => &[Slot::Init, Slot::PreAuth, Slot::Auth, Slot::PostAuth, Slot::PreDataLoad],
            OperationKind::Mutation => &[Slot::Init, Slot::PreAuth, Slot::Auth, Slot::PostAuth, Slot::PreUpdate],
            OperationKind::Subscription => &[Slot::Init, Slot::PreAuth, Slot::Auth, Slot::PostAuth, Slot::PreSubscribe],
        }
    }

    pub fn response_slots(self) -> &'static [Slot] {
        match self {
            OperationKind::Query => &[Slot::PostDataLoad, Slot::Finish],
            OperationKind::Mutation => &[Slot::PostUpdate, Slot::Finish],
            OperationKind::Subscription => &[],
        }
    }
}
