//! Variable-templated HTTP request engine.
//!
//! Stored request templates contain `{{variable}}` placeholders and `{key}`
//! path parameters. Sending one resolves the placeholders against built-in
//! variables and an optional environment, builds and executes the HTTP
//! request, classifies the response body as JSON or not, and can copy a
//! value from the JSON body back into the environment.
//!
//! # Architecture
//!
//! - **models**: Request templates, bodies, auth and responses
//! - **environment**: Named sets of variables
//! - **variables**: Built-in variables, substitution and template resolution
//! - **assembler**: Turns a resolved template into a transport request
//! - **auth**: Bearer, Basic and API key headers
//! - **executor**: Executes requests using reqwest
//! - **formatter**: JSON detection, pretty-printing and path extraction
//! - **effects**: Post-request actions
//! - **store**: Storage traits and an in-memory store
//! - **service**: The end-to-end `send_request` pipeline
//! - **config**: Global engine settings
//!
//! # Example
//!
//! ```no_run
//! use rest_engine::environment::Environment;
//! use rest_engine::executor::HttpExecutor;
//! use rest_engine::models::{HttpMethod, PostRequestAction, RequestTemplate};
//! use rest_engine::store::MemoryStore;
//! use rest_engine::RequestService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//!
//! let mut login = RequestTemplate::new("login", HttpMethod::POST, "https://{{host}}/login")
//!     .with_post_request(PostRequestAction::set_env_from_body("session.id", "sid"));
//! login.add_header("X-Trace", "{{randomUUID4}}");
//! store.insert_request(login);
//!
//! let mut dev = Environment::new("dev", "Development");
//! dev.set_key("host", "api.example.com");
//! store.insert_environment(dev);
//!
//! let service = RequestService::new(store.clone(), store.clone(), HttpExecutor::from_global_config()?);
//! let response = service.send_request("login", Some("dev")).await?;
//!
//! println!("{}", response.status_line());
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod auth;
pub mod config;
pub mod effects;
pub mod environment;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod models;
pub mod service;
pub mod store;
pub mod variables;

pub use error::{EntityKind, SendError};
pub use formatter::{encode_json, get_json_path, is_json, parse_json, pretty_json};
pub use service::RequestService;
