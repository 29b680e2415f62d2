//! In-memory stand-ins for the Security Lake, IAM and STS clients.
//!
//! Every fake built from the same [`Backend`] shares one recorder, so tests can assert on the
//! exact sequence of remote calls, or on their absence.

use crate::arn::role_arn;
use crate::aws::policy::{customer_policy_arn, PolicyDocument};
use crate::aws::{ApiError, ApiResult, IamApi, IdentityApi, SecurityLakeApi};
use crate::commands::SecurityLakeToolsService;
use crate::types::{
    CustomLogSource, CustomSourceRequest, DataLake, DataLakeException, LogSource, StatusSnapshot,
    Subscriber,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub(crate) const ACCOUNT_ID: &str = "123456789012";

#[derive(Debug, Default)]
pub(crate) struct Recorded {
    pub calls: Vec<&'static str>,
    pub source_requests: Vec<CustomSourceRequest>,
    pub trust_policies: Vec<PolicyDocument>,
    pub attachments: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder(Arc<Mutex<Recorded>>);

impl Recorder {
    fn with<T>(&self, f: impl FnOnce(&mut Recorded) -> T) -> T {
        let mut guard = self.0.lock().expect("recorder lock poisoned");
        f(&mut guard)
    }

    fn call(&self, operation: &'static str) {
        self.with(|r| r.calls.push(operation));
    }
}

fn injected(fail_on: &Option<(&'static str, ApiError)>, operation: &str) -> ApiResult<()> {
    match fail_on {
        Some((op, err)) if *op == operation => Err(err.clone()),
        _ => Ok(()),
    }
}

pub(crate) fn service_error(operation: &'static str, code: &str, message: &str) -> ApiError {
    ApiError::Service {
        operation,
        code: Some(code.to_string()),
        message: message.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeSecurityLake {
    pub snapshot: StatusSnapshot,
    pub fail_on: Option<(&'static str, ApiError)>,
    /// Returned by CreateCustomLogSource; when unset the request's source name is echoed back.
    pub created_source: Option<CustomLogSource>,
    pub recorder: Recorder,
}

#[async_trait]
impl SecurityLakeApi for FakeSecurityLake {
    async fn list_data_lakes(&self) -> ApiResult<Vec<DataLake>> {
        self.recorder.call("ListDataLakes");
        injected(&self.fail_on, "ListDataLakes")?;
        Ok(self.snapshot.data_lakes.clone())
    }

    async fn list_data_lake_exceptions(&self) -> ApiResult<Vec<DataLakeException>> {
        self.recorder.call("ListDataLakeExceptions");
        injected(&self.fail_on, "ListDataLakeExceptions")?;
        Ok(self.snapshot.exceptions.clone())
    }

    async fn list_log_sources(&self) -> ApiResult<Vec<LogSource>> {
        self.recorder.call("ListLogSources");
        injected(&self.fail_on, "ListLogSources")?;
        Ok(self.snapshot.log_sources.clone())
    }

    async fn list_subscribers(&self) -> ApiResult<Vec<Subscriber>> {
        self.recorder.call("ListSubscribers");
        injected(&self.fail_on, "ListSubscribers")?;
        Ok(self.snapshot.subscribers.clone())
    }

    async fn create_custom_log_source(
        &self,
        request: &CustomSourceRequest,
    ) -> ApiResult<CustomLogSource> {
        self.recorder.call("CreateCustomLogSource");
        self.recorder
            .with(|r| r.source_requests.push(request.clone()));
        injected(&self.fail_on, "CreateCustomLogSource")?;
        Ok(self.created_source.clone().unwrap_or_else(|| CustomLogSource {
            name: Some(request.source_name.clone()),
            ..CustomLogSource::default()
        }))
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeIam {
    pub existing_roles: Vec<String>,
    pub existing_policies: Vec<String>,
    pub fail_on: Option<(&'static str, ApiError)>,
    pub recorder: Recorder,
}

#[async_trait]
impl IamApi for FakeIam {
    async fn get_role(&self, role_name: &str) -> ApiResult<String> {
        self.recorder.call("GetRole");
        injected(&self.fail_on, "GetRole")?;
        if self.existing_roles.iter().any(|name| name == role_name) {
            Ok(role_arn(ACCOUNT_ID, role_name))
        } else {
            Err(service_error(
                "GetRole",
                "NoSuchEntity",
                &format!("The role with name {role_name} cannot be found."),
            ))
        }
    }

    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &PolicyDocument,
        _description: &str,
    ) -> ApiResult<String> {
        self.recorder.call("CreateRole");
        self.recorder
            .with(|r| r.trust_policies.push(trust_policy.clone()));
        injected(&self.fail_on, "CreateRole")?;
        Ok(role_arn(ACCOUNT_ID, role_name))
    }

    async fn create_policy(
        &self,
        policy_name: &str,
        _document: &PolicyDocument,
        _description: &str,
    ) -> ApiResult<String> {
        self.recorder.call("CreatePolicy");
        injected(&self.fail_on, "CreatePolicy")?;
        if self.existing_policies.iter().any(|name| name == policy_name) {
            return Err(service_error(
                "CreatePolicy",
                "EntityAlreadyExists",
                &format!("A policy called {policy_name} already exists."),
            ));
        }
        Ok(customer_policy_arn(ACCOUNT_ID, policy_name))
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> ApiResult<()> {
        self.recorder.call("AttachRolePolicy");
        injected(&self.fail_on, "AttachRolePolicy")?;
        self.recorder.with(|r| {
            r.attachments
                .push((role_name.to_string(), policy_arn.to_string()));
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FakeIdentity {
    pub account: ApiResult<String>,
    pub recorder: Recorder,
}

impl Default for FakeIdentity {
    fn default() -> Self {
        Self {
            account: Ok(ACCOUNT_ID.to_string()),
            recorder: Recorder::default(),
        }
    }
}

#[async_trait]
impl IdentityApi for FakeIdentity {
    async fn caller_account_id(&self) -> ApiResult<String> {
        self.recorder.call("GetCallerIdentity");
        self.account.clone()
    }
}

/// A set of fakes sharing one recorder.
#[derive(Debug, Default)]
pub(crate) struct Backend {
    lake: FakeSecurityLake,
    iam: FakeIam,
    identity: FakeIdentity,
    recorder: Recorder,
}

impl Backend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lake(mut self, lake: FakeSecurityLake) -> Self {
        self.lake = lake;
        self
    }

    pub fn with_iam(mut self, iam: FakeIam) -> Self {
        self.iam = iam;
        self
    }

    pub fn with_identity(mut self, identity: FakeIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn service(&self, region: &str) -> SecurityLakeToolsService {
        let mut lake = self.lake.clone();
        lake.recorder = self.recorder.clone();
        let mut iam = self.iam.clone();
        iam.recorder = self.recorder.clone();
        let mut identity = self.identity.clone();
        identity.recorder = self.recorder.clone();
        SecurityLakeToolsService::with_clients(
            region,
            Box::new(lake),
            Box::new(iam),
            Box::new(identity),
        )
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.recorder.with(|r| r.calls.clone())
    }

    pub fn count(&self, operation: &str) -> usize {
        self.recorder
            .with(|r| r.calls.iter().filter(|call| **call == operation).count())
    }

    pub fn source_requests(&self) -> Vec<CustomSourceRequest> {
        self.recorder.with(|r| r.source_requests.clone())
    }

    pub fn trust_policies(&self) -> Vec<PolicyDocument> {
        self.recorder.with(|r| r.trust_policies.clone())
    }

    pub fn attachments(&self) -> Vec<(String, String)> {
        self.recorder.with(|r| r.attachments.clone())
    }
}
