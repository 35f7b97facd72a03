//! [`Context`]-related definitions.

use std::{
    iter,
    sync::atomic::{self, AtomicU16},
};

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{self, Header},
    TypedHeader,
};
use http::{HeaderName, HeaderValue};
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::domain::{company, supplier};

use crate::{define_error, AsError as _, Error, JuniperResponse, Service};

/// Name of the HTTP header carrying the ID of the calling company.
pub static COMPANY_ID_HEADER: HeaderName =
    HeaderName::from_static("x-company-id");

/// Name of the HTTP header carrying the ID of the calling supplier.
pub static SUPPLIER_ID_HEADER: HeaderName =
    HeaderName::from_static("x-supplier-id");

/// Application context.
///
/// Caller identity is asserted by an upstream authenticating gateway via the
/// [`COMPANY_ID_HEADER`] and [`SUPPLIER_ID_HEADER`].
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Error status code.
    error_status_code: AtomicU16,

    /// Parts of the HTTP request.
    parts: http::request::Parts,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the error status code of this [`Context`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Returns ID of the company performing the current request.
    ///
    /// # Errors
    ///
    /// Errors if the [`COMPANY_ID_HEADER`] is missing or malformed.
    pub async fn current_company(&self) -> Result<company::Id, Error> {
        self.identity::<CompanyId>().await.map(|CompanyId(id)| id)
    }

    /// Returns ID of the supplier performing the current request.
    ///
    /// # Errors
    ///
    /// Errors if the [`SUPPLIER_ID_HEADER`] is missing or malformed.
    pub async fn current_supplier(&self) -> Result<supplier::Id, Error> {
        self.identity::<SupplierId>().await.map(|SupplierId(id)| id)
    }

    /// Extracts the identity `H`eader of the current request.
    async fn identity<H>(&self) -> Result<H, Error>
    where
        H: Header + Send + 'static,
    {
        let res = self.parts.clone().extract::<TypedHeader<H>>().await;
        match res {
            Ok(TypedHeader(h)) => Ok(h),
            Err(e) => {
                if e.is_missing() {
                    Err(AuthError::AuthorizationRequired.into())
                } else {
                    Err(e.into_error())
                }
            }
        }
        .map_err(self.error())
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                JuniperResponse {
                    status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(
                            Error::internal(&"missing `Service` extension")
                                .into_field_error(),
                        ),
                    ),
                }
            })?;

        Ok(Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            parts: parts.clone(),
        })
    }
}

/// Defines a typed HTTP [`Header`] carrying an ID.
macro_rules! define_id_header {
    ($name:ident($id:ty) = $header:ident) => {
        #[doc = concat!("Typed [`", stringify!($header), "`].")]
        #[derive(Clone, Copy, Debug)]
        struct $name($id);

        impl Header for $name {
            fn name() -> &'static HeaderName {
                &$header
            }

            fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
            where
                I: Iterator<Item = &'i HeaderValue>,
            {
                values
                    .next()
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok())
                    .map(Self)
                    .ok_or_else(headers::Error::invalid)
            }

            fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
                if let Ok(v) = HeaderValue::from_str(&self.0.to_string()) {
                    values.extend(iter::once(v));
                }
            }
        }
    };
}

define_id_header!(CompanyId(company::Id) = COMPANY_ID_HEADER);
define_id_header!(SupplierId(supplier::Id) = SUPPLIER_ID_HEADER);

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,
    }
}
