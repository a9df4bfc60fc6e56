//! User accounts, the session cookie and the sign-in flow.

mod cookie;
mod email;
mod error;
mod middleware;
mod password;
mod provider;
mod redirect;
mod sign_in;
mod sign_out;
mod sign_up;
mod throttle;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use email::Email;
pub use error::AuthErrorKind;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::{PASSWORD_MIN_LENGTH, PasswordHash, ValidatedPassword};
pub use redirect::normalize_redirect_url;
pub use sign_in::{SignInState, get_sign_in_page, post_sign_in};
pub use sign_out::get_sign_out;
pub use sign_up::post_sign_up;
pub use throttle::SignInThrottle;
pub(crate) use token::Token;
pub(crate) use user::create_user;
pub use user::{
    User, UserID, create_user_table, get_user_by_email, get_user_by_id, set_user_disabled,
    update_password,
};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
#[cfg(test)]
pub(crate) use redirect::sign_in_url_with_redirect;
