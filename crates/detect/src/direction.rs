//! Traffic direction and application-layer protocol identifiers.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// The side of a flow a piece of traffic travels to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Client to server: requests.
    ToServer,
    /// Server to client: responses.
    ToClient,
}

impl Direction {
    /// The rule-language token for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::ToServer => "to_server",
            Direction::ToClient => "to_client",
        }
    }

    /// Parses a keyword direction modifier (`to_server` / `to_client`).
    pub fn from_option(option: &str) -> Option<Self> {
        match option.trim() {
            "to_server" => Some(Direction::ToServer),
            "to_client" => Some(Direction::ToClient),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::ToServer => Direction::ToClient,
            Direction::ToClient => Direction::ToServer,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// A set of directions, used for keyword capabilities and signature scope.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirectionSet: u8 {
        const TO_SERVER = 1 << 0;
        const TO_CLIENT = 1 << 1;
    }
}

impl DirectionSet {
    /// Iterates the contained directions, to-server first.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        [Direction::ToServer, Direction::ToClient].into_iter().filter(move |d| self.contains((*d).into()))
    }

    /// Returns true if both directions are present.
    #[inline]
    pub fn is_bidirectional(self) -> bool {
        self.contains(Self::all())
    }

    #[inline]
    pub fn has(self, direction: Direction) -> bool {
        self.contains(direction.into())
    }
}

impl From<Direction> for DirectionSet {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::ToServer => DirectionSet::TO_SERVER,
            Direction::ToClient => DirectionSet::TO_CLIENT,
        }
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter().fold(DirectionSet::empty(), |set, d| set | d.into())
    }
}

/// Application-layer protocol a signature or a transaction belongs to.
///
/// [`AppProto::Http`] is the protocol family covering both [`AppProto::Http1`]
/// and [`AppProto::Http2`]. Transactions always carry a concrete protocol,
/// signatures may be pinned to the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppProto {
    #[default]
    Unknown,
    Http,
    Http1,
    Http2,
    Tls,
    Dns,
    Smtp,
}

impl AppProto {
    pub fn name(self) -> &'static str {
        match self {
            AppProto::Unknown => "unknown",
            AppProto::Http => "http",
            AppProto::Http1 => "http1",
            AppProto::Http2 => "http2",
            AppProto::Tls => "tls",
            AppProto::Dns => "dns",
            AppProto::Smtp => "smtp",
        }
    }

    #[inline]
    pub fn is_http(self) -> bool {
        matches!(self, AppProto::Http | AppProto::Http1 | AppProto::Http2)
    }

    /// Returns true if something pinned to `self` may inspect a transaction of `tx_proto`.
    pub fn matches(self, tx_proto: AppProto) -> bool {
        match self {
            AppProto::Unknown => true,
            AppProto::Http => tx_proto.is_http(),
            proto => proto == tx_proto,
        }
    }

    /// Narrows a signature pin with a newly requested protocol.
    ///
    /// Returns `None` if the two are incompatible.
    pub fn merge(self, requested: AppProto) -> Option<AppProto> {
        match (self, requested) {
            (AppProto::Unknown, requested) => Some(requested),
            (current, AppProto::Unknown) => Some(current),
            (current, requested) if current == requested => Some(current),
            (AppProto::Http, requested @ (AppProto::Http1 | AppProto::Http2)) => Some(requested),
            (current @ (AppProto::Http1 | AppProto::Http2), AppProto::Http) => Some(current),
            _ => None,
        }
    }
}

impl fmt::Display for AppProto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
