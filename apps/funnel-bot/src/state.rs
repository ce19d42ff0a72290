use std::sync::Arc;

use funnel_db::repositories::user_repo::UserRepository;

use crate::config::Config;
use crate::messenger::Messenger;
use crate::reviews::ReviewCarousel;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: UserRepository,
    pub sessions: SessionStore,
    pub carousel: Arc<ReviewCarousel>,
    pub messenger: Messenger,
}
