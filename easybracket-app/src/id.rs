//! Identifiers of stored entities. New identifiers are snowflakes and therefore increase over
//! time.
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use easybracket_core::CompetitorId;
use serde::{Deserialize, Serialize};
use snowflaked::sync::Generator;

const INSTANCE: u16 = 0;

static TOURNAMENT: Generator = Generator::new_unchecked(INSTANCE);
static TEAM: Generator = Generator::new_unchecked(INSTANCE);
static SOLO_PLAYER: Generator = Generator::new_unchecked(INSTANCE);
static USER: Generator = Generator::new_unchecked(INSTANCE);

macro_rules! id {
    ($name:ident, $generator:ident) => {
        #[derive(
            Copy,
            Clone,
            Debug,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Generates a new unique identifier.
            #[inline]
            pub fn generate() -> Self {
                Self($generator.generate())
            }
        }

        impl Display for $name {
            #[inline]
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl AsRef<u64> for $name {
            #[inline]
            fn as_ref(&self) -> &u64 {
                &self.0
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = <u64 as FromStr>::Err;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse::<u64>()?))
            }
        }
    };
}

id!(TournamentId, TOURNAMENT);
id!(TeamId, TEAM);
id!(SoloPlayerId, SOLO_PLAYER);
id!(UserId, USER);

impl From<TeamId> for CompetitorId {
    #[inline]
    fn from(id: TeamId) -> Self {
        Self(id.0)
    }
}

impl From<CompetitorId> for TeamId {
    #[inline]
    fn from(id: CompetitorId) -> Self {
        Self(id.0)
    }
}
