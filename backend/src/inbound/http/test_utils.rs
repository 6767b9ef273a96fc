//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{HttpResponse, web};
use mockable::DefaultClock;

use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::ports::{LoginService, MockLoginService};
use crate::domain::{
    ContactService, Error, NetworkService, ProductService, StaffAccount, StaffId,
};
use crate::outbound::memory::InMemoryNetworkStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Active staff account with id 1.
pub fn staff_account() -> StaffAccount {
    StaffAccount {
        id: StaffId::new(1),
        username: "manager".to_owned(),
        is_active: true,
        is_staff: true,
        is_superuser: false,
    }
}

/// Login port that resolves every session to [`staff_account`].
pub fn staff_login() -> MockLoginService {
    let mut login = MockLoginService::new();
    login
        .expect_resolve()
        .returning(|_| Ok(Some(staff_account())));
    login
}

/// HTTP state over a fresh in-memory store with the given login port.
pub fn state_with_login(login: Arc<dyn LoginService>) -> HttpState {
    let store = Arc::new(InMemoryNetworkStore::new());
    let network = Arc::new(NetworkService::new(
        Arc::clone(&store),
        Arc::new(DefaultClock),
    ));
    HttpState {
        login,
        network: network.clone(),
        network_query: network,
        contacts: Arc::new(ContactService::new(Arc::clone(&store))),
        products: Arc::new(ProductService::new(store)),
    }
}

/// In-memory state whose sessions always belong to an active staff member.
pub fn staff_state() -> web::Data<HttpState> {
    web::Data::new(state_with_login(Arc::new(staff_login())))
}

/// Handler that signs the caller in as staff id 1 without credentials.
pub async fn test_sign_in(session: SessionContext) -> Result<HttpResponse, Error> {
    session.persist_staff(StaffId::new(1))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Extract the session cookie from a response.
pub fn session_cookie<B>(res: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
