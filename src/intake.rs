use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Constants, EnvVars};
use crate::db::{RegistrationStore, StoreError};
use crate::error::IntakeError;
use crate::structure::registration::{
    Material, Registration, RegistrationReceipt, RegistrationRequest, RegistrationStatus,
};
use crate::utils::code::generate_registration_id;
use crate::utils::rate_limit::RateLimiter;
use crate::utils::validation::{field_value, validate_form, Field};

pub const BODY_REQUIRED_MESSAGE: &str = "Request body is required";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";
pub const DUPLICATE_ROLL_NUMBER_MESSAGE: &str = "This roll number is already registered";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "This email address is already registered";

type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Runs one submission through rate limiting, validation and storage
pub struct IntakeService {
    store: Arc<dyn RegistrationStore>,
    limiter: RateLimiter,
    store_timeout: Duration,
    generate_id: IdGenerator,
}

impl IntakeService {
    pub fn new(store: Arc<dyn RegistrationStore>, limiter: RateLimiter) -> Self {
        IntakeService {
            store,
            limiter,
            store_timeout: EnvVars::store_timeout(),
            generate_id: Arc::new(generate_registration_id),
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_id_generator<F>(mut self, generate_id: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.generate_id = Arc::new(generate_id);
        self
    }

    pub fn store(&self) -> &Arc<dyn RegistrationStore> {
        &self.store
    }

    /// Submit an already decoded request; `None` means the body was absent
    pub async fn submit(
        &self,
        request: Option<RegistrationRequest>,
        client_id: Option<&str>,
    ) -> Result<RegistrationReceipt, IntakeError> {
        let client_id = resolve_client_id(client_id);
        let result = match self.admit(client_id) {
            Ok(()) => self.process(request, client_id).await,
            Err(err) => Err(err),
        };
        log_rejection(&result);
        result
    }

    /// Submit a raw JSON body; decoding happens after the rate-limit check
    pub async fn submit_json(
        &self,
        body: &[u8],
        client_id: Option<&str>,
    ) -> Result<RegistrationReceipt, IntakeError> {
        let client_id = resolve_client_id(client_id);
        let result = match self.admit(client_id).and_then(|()| decode_request(body)) {
            Ok(request) => self.process(request, client_id).await,
            Err(err) => Err(err),
        };
        log_rejection(&result);
        result
    }

    fn admit(&self, client_id: &str) -> Result<(), IntakeError> {
        if self.limiter.check(client_id) {
            Ok(())
        } else {
            Err(IntakeError::RateLimited)
        }
    }

    async fn process(
        &self,
        request: Option<RegistrationRequest>,
        client_id: &str,
    ) -> Result<RegistrationReceipt, IntakeError> {
        let request = request.ok_or_else(|| IntakeError::bad_request(BODY_REQUIRED_MESSAGE))?;

        let validation = validate_form(&request);
        if let Some((field, message)) = validation.errors.first() {
            return Err(IntakeError::ValidationFailed {
                field: field.as_str(),
                message: message.to_string(),
            });
        }

        let mut registration = normalize(&request, client_id)?;

        for _ in 0..Constants::MAX_ID_ATTEMPTS {
            registration.id = (self.generate_id)();
            match self.insert(registration.clone()).await {
                Ok(()) => {
                    tracing::info!(
                        "New registration: {} - {} ({})",
                        registration.id,
                        registration.name,
                        registration.email
                    );
                    return Ok(RegistrationReceipt {
                        id: registration.id,
                        message: Constants::REGISTRATION_SUCCESS_MESSAGE.to_string(),
                    });
                }
                Err(StoreError::DuplicateId) => {
                    tracing::debug!("registration id {} taken, re-rolling", registration.id);
                }
                Err(StoreError::DuplicateRollNumber) => {
                    return Err(IntakeError::Conflict {
                        field: Field::RollNumber.as_str(),
                        message: DUPLICATE_ROLL_NUMBER_MESSAGE.to_string(),
                    });
                }
                Err(StoreError::DuplicateEmail) => {
                    return Err(IntakeError::Conflict {
                        field: Field::Email.as_str(),
                        message: DUPLICATE_EMAIL_MESSAGE.to_string(),
                    });
                }
                Err(err @ StoreError::Unavailable(_)) => {
                    tracing::error!("Registration error: {err}");
                    return Err(IntakeError::InternalError);
                }
            }
        }

        tracing::error!(
            "Registration error: no free registration id after {} attempts",
            Constants::MAX_ID_ATTEMPTS
        );
        Err(IntakeError::InternalError)
    }

    async fn insert(&self, registration: Registration) -> Result<(), StoreError> {
        match tokio::time::timeout(self.store_timeout, self.store.insert(registration)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable(format!(
                "insert timed out after {:?}",
                self.store_timeout
            ))),
        }
    }
}

fn resolve_client_id(client_id: Option<&str>) -> &str {
    client_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(Constants::UNKNOWN_CLIENT)
}

/// Decode a JSON body; an empty body or a JSON `null` is an absent request
pub fn decode_request(body: &[u8]) -> Result<Option<RegistrationRequest>, IntakeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| IntakeError::bad_request(INVALID_BODY_MESSAGE))?;

    // Name the first known key whose value is neither a string nor null.
    if let Value::Object(map) = &value {
        let mistyped = Field::ALL.into_iter().find(|field| {
            map.get(field.as_str())
                .is_some_and(|v| !v.is_string() && !v.is_null())
        });
        if let Some(field) = mistyped {
            return Err(IntakeError::bad_field(field.as_str(), INVALID_BODY_MESSAGE));
        }
    }

    serde_json::from_value::<Option<RegistrationRequest>>(value)
        .map_err(|_| IntakeError::bad_request(INVALID_BODY_MESSAGE))
}

fn normalize(request: &RegistrationRequest, client_id: &str) -> Result<Registration, IntakeError> {
    let value = |field: Field| field_value(request, field).unwrap_or_default();

    let selected_material = Material::from_id(value(Field::SelectedMaterial)).ok_or_else(|| {
        tracing::error!("Registration error: validated material is not in the catalog");
        IntakeError::InternalError
    })?;

    Ok(Registration {
        id: String::new(),
        name: value(Field::Name).trim().to_string(),
        roll_number: value(Field::RollNumber).trim().to_uppercase(),
        department: value(Field::Department).trim().to_string(),
        year_of_study: value(Field::YearOfStudy).trim().to_string(),
        email: value(Field::Email).trim().to_lowercase(),
        phone: value(Field::Phone).split_whitespace().collect(),
        selected_material,
        idea_description: value(Field::IdeaDescription).trim().to_string(),
        registered_at: Utc::now(),
        status: RegistrationStatus::Registered,
        client_identifier: client_id.to_string(),
    })
}

fn log_rejection(result: &Result<RegistrationReceipt, IntakeError>) {
    if let Err(err) = result {
        if !matches!(err, IntakeError::InternalError) {
            tracing::debug!(kind = err.kind(), field = err.field(), "registration rejected");
        }
    }
}
