//! Sending stored requests.
//!
//! [`RequestService`] ties the pipeline together: it loads a template and an
//! optional environment from their stores, resolves placeholders, assembles
//! and executes the request, classifies the response and finally runs the
//! template's post-request action.

use crate::assembler::{assemble, PreparedRequest};
use crate::environment::Environment;
use crate::error::{EntityKind, SendError};
use crate::effects::apply_post_request;
use crate::executor::HttpExecutor;
use crate::formatter::classify;
use crate::models::{RequestTemplate, Response};
use crate::store::{EnvironmentStore, RequestStore};
use crate::variables::{resolve_request, BuiltinSource, SystemBuiltins};

/// Sends stored request templates.
///
/// Stores are only read, except for the environment update made by a
/// post-request action. Stored templates are never modified.
#[derive(Debug)]
pub struct RequestService<R, E, B = SystemBuiltins> {
    requests: R,
    environments: E,
    builtins: B,
    executor: HttpExecutor,
}

impl<R, E> RequestService<R, E, SystemBuiltins>
where
    R: RequestStore,
    E: EnvironmentStore,
{
    /// Creates a service that uses the system clock and random UUIDs for
    /// built-in variables.
    pub fn new(requests: R, environments: E, executor: HttpExecutor) -> Self {
        Self {
            requests,
            environments,
            builtins: SystemBuiltins,
            executor,
        }
    }
}

impl<R, E, B> RequestService<R, E, B>
where
    R: RequestStore,
    E: EnvironmentStore,
    B: BuiltinSource,
{
    /// Replaces the source of built-in variable values.
    pub fn with_builtins<B2: BuiltinSource>(self, builtins: B2) -> RequestService<R, E, B2> {
        RequestService {
            requests: self.requests,
            environments: self.environments,
            builtins,
            executor: self.executor,
        }
    }

    pub fn executor(&self) -> &HttpExecutor {
        &self.executor
    }

    /// Resolves and assembles a stored request without sending it.
    pub fn prepare_request(
        &self,
        request_id: &str,
        environment_id: Option<&str>,
    ) -> Result<PreparedRequest, SendError> {
        let (template, environment) = self.load(request_id, environment_id)?;
        let resolved = resolve_request(template, environment.as_ref(), &self.builtins);
        Ok(assemble(&resolved.request)?)
    }

    /// Sends a stored request, optionally within an environment.
    ///
    /// An empty `environment_id` is the same as `None`. Any failure is
    /// returned unchanged and nothing is retried. If the post-request action
    /// updates the environment and saving it fails, the response is dropped
    /// and [`SendError::EffectPersist`] is returned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rest_engine::executor::HttpExecutor;
    /// use rest_engine::models::{HttpMethod, RequestTemplate};
    /// use rest_engine::service::RequestService;
    /// use rest_engine::store::MemoryStore;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let store = MemoryStore::new();
    /// store.insert_request(RequestTemplate::new("r1", HttpMethod::GET, "https://httpbin.org/get"));
    ///
    /// let service = RequestService::new(store.clone(), store, HttpExecutor::from_global_config()?);
    /// let response = service.send_request("r1", None).await?;
    /// println!("{}", response.status_line());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_request(
        &self,
        request_id: &str,
        environment_id: Option<&str>,
    ) -> Result<Response, SendError> {
        let (template, environment) = self.load(request_id, environment_id)?;

        // The action is taken from the stored template, before substitution.
        let post_request = template.post_request.clone();

        let resolved = resolve_request(template, environment.as_ref(), &self.builtins);
        let prepared = assemble(&resolved.request)?;
        let response = self.executor.execute(&prepared).await?;
        let response = classify(response)?;

        apply_post_request(
            post_request.as_ref(),
            &response,
            environment,
            &self.environments,
        )?;

        Ok(response)
    }

    /// Fetches a copy of the template and of the environment, if any.
    fn load(
        &self,
        request_id: &str,
        environment_id: Option<&str>,
    ) -> Result<(RequestTemplate, Option<Environment>), SendError> {
        let template = self
            .requests
            .get_request(request_id)
            .ok_or_else(|| SendError::not_found(EntityKind::Request, request_id))?;

        let environment = match environment_id.filter(|id| !id.is_empty()) {
            Some(id) => Some(
                self.environments
                    .get_environment(id)
                    .ok_or_else(|| SendError::not_found(EntityKind::Environment, id))?,
            ),
            None => None,
        };

        Ok((template, environment))
    }
}
