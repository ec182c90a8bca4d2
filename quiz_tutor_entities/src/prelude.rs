pub use crate::domain::entity::{CourseExecutionEntity, LoadEntity};
pub use crate::domain::topic::{Topic, TopicConjunction};
pub use crate::domain::tournament::{
    Tournament, TournamentError, TournamentSettings, TournamentStatus,
};
pub use crate::domain::user::{CourseExecution, User};
