//! Configuration
//!
//! [`Settings::load`] layers built-in defaults, `config/default.toml`,
//! `config/{RUN_ENV}.toml`, `APP__SECTION__KEY` variables and finally a few
//! plain variables (`DATABASE_URL`, `REDIS_URL`, `JWT_SECRET`, ...). A
//! `.env` file is read first when present.

mod settings;

pub use settings::*;
