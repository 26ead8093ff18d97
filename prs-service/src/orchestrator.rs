//! [`ExchangeOrchestrator`]: the glue that validates inputs, enforces
//! policy, and assembles responses (spec §4.8).
//!
//! Assembled once at startup as a "service bundle" (spec §9 redesign
//! flag) and cloned cheaply per request — the `Arc`-backed fields make
//! cloning cheap, following `OprfKeyMaterialStore`'s `#[derive(Clone)]`
//! over `Arc` idiom.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use prs_core::{MasterKey, OprfEngine, PseudonymEngine, RidEngine};
use prs_types::{
    AuthenticatedCaller, DirectPseudonymType, Organisation, PersonalId, Pseudonym, PrsError,
    RidClaims, UraNumber, UsageTier,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::jwe::JweEnvelope;
use crate::metrics::{
    METRICS_ID_EXCHANGE_DIRECT_SUCCESS, METRICS_ID_OPRF_SUCCESS, METRICS_ID_POLICY_DENIED,
    METRICS_ID_RID_ISSUED, METRICS_ID_RID_REDEEMED,
};
use crate::policy;
use crate::registry::KeyRegistryService;

/// The response body for a successful RID redemption (spec §6.2).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReceiveResponse {
    /// The derived pseudonym string.
    pub pseudonym: String,
    /// The pseudonym type it was derived as.
    #[serde(rename = "type")]
    pub pseudonym_type: UsageTier,
}

/// The cryptographic/protocol core's single entry point: validate inputs,
/// enforce policy, assemble responses (spec §4.8). Stateless per request
/// beyond the read-only [`crate::registry::KeyRegistry`] and process-wide
/// secrets.
#[derive(Clone)]
pub struct ExchangeOrchestrator {
    registry: KeyRegistryService,
    master: Arc<MasterKey>,
    oprf: Arc<OprfEngine>,
    jwe_validity_secs: u64,
}

impl ExchangeOrchestrator {
    /// Assembles the orchestrator from its long-lived dependencies.
    pub fn new(
        registry: KeyRegistryService,
        master: MasterKey,
        oprf: OprfEngine,
        jwe_validity_secs: u64,
    ) -> Self {
        Self {
            registry,
            master: Arc::new(master),
            oprf: Arc::new(oprf),
            jwe_validity_secs,
        }
    }

    async fn resolve_recipient(
        &self,
        recipient_org: &str,
        recipient_scope: &str,
    ) -> Result<(Organisation, rsa::RsaPublicKey), PrsError> {
        let ura = UraNumber::parse_prefixed(recipient_org)?;
        let organisation = self
            .registry
            .organisation(&ura)
            .await?
            .ok_or(PrsError::OrganizationNotFound)?;
        let pub_key = self
            .registry
            .resolve(&ura, recipient_scope)
            .await?
            .ok_or(PrsError::PubKeyNotFound)?;
        Ok((organisation, pub_key))
    }

    /// Exchanges a personal identifier for a direct pseudonym (spec §4.8.1).
    pub async fn exchange_direct(
        &self,
        caller: &AuthenticatedCaller,
        personal_id: &PersonalId,
        recipient_org: &str,
        recipient_scope: &str,
        pseudonym_type: DirectPseudonymType,
    ) -> Result<String, PrsError> {
        let ura = UraNumber::parse_prefixed(recipient_org)?;
        // Confirms the recipient organisation exists before any further
        // work; the value itself isn't needed past this point.
        self.registry
            .organisation(&ura)
            .await?
            .ok_or(PrsError::OrganizationNotFound)?;

        if pseudonym_type == DirectPseudonymType::Reversible {
            let caller_org = self
                .registry
                .organisation(&caller.ura)
                .await?
                .ok_or(PrsError::OrganizationNotFound)?;
            if !policy::may_originate_reversible(caller_org.max_rid_usage) {
                metrics::counter!(METRICS_ID_POLICY_DENIED).increment(1);
                return Err(PrsError::PolicyDenied);
            }
        }

        let pub_key = self
            .registry
            .resolve(&ura, recipient_scope)
            .await?
            .ok_or(PrsError::PubKeyNotFound)?;

        let engine = PseudonymEngine::new(&self.master);
        let subject = match pseudonym_type {
            DirectPseudonymType::Irreversible => {
                engine.generate_irreversible(personal_id, recipient_org, recipient_scope)?
            }
            DirectPseudonymType::Reversible => {
                engine.generate_reversible(personal_id, recipient_org, recipient_scope)?
            }
        };

        let jwe = JweEnvelope::build(
            recipient_org,
            recipient_scope,
            &subject,
            &pub_key,
            Map::new(),
            self.jwe_validity_secs,
        )?;
        metrics::counter!(METRICS_ID_EXCHANGE_DIRECT_SUCCESS).increment(1);
        Ok(jwe)
    }

    /// Issues a RID (spec §4.8.2).
    pub async fn issue_rid(
        &self,
        personal_id: &PersonalId,
        recipient_org: &str,
        recipient_scope: &str,
        rid_usage: UsageTier,
    ) -> Result<String, PrsError> {
        let (_, pub_key) = self.resolve_recipient(recipient_org, recipient_scope).await?;

        let claims = RidClaims {
            usage: rid_usage,
            recipient_organization: recipient_org.to_string(),
            recipient_scope: recipient_scope.to_string(),
            personal_id: personal_id.canonical(),
        };
        let claims_json = serde_json::to_vec(&claims).map_err(|_| PrsError::CryptoInternal)?;
        let rid_engine = RidEngine::new(&self.master);
        let token = rid_engine.encrypt_rid(&claims_json)?;
        let subject = Pseudonym::Rid(token).to_string();

        let mut extra = Map::new();
        extra.insert("ridUsage".to_string(), Value::String(rid_usage.to_string()));

        let jwe = JweEnvelope::build(
            recipient_org,
            recipient_scope,
            &subject,
            &pub_key,
            extra,
            self.jwe_validity_secs,
        )?;
        metrics::counter!(METRICS_ID_RID_ISSUED).increment(1);
        Ok(jwe)
    }

    /// Redeems a RID (spec §4.8.3).
    pub async fn redeem_rid(
        &self,
        rid: &str,
        recipient_org: &str,
        recipient_scope: &str,
        pseudonym_type: UsageTier,
    ) -> Result<ReceiveResponse, PrsError> {
        let Pseudonym::Rid(token) = Pseudonym::parse(rid).map_err(|_| PrsError::InvalidRid)? else {
            return Err(PrsError::InvalidRid);
        };
        let rid_engine = RidEngine::new(&self.master);
        let claims_json = rid_engine.decrypt_rid(&token)?;
        let claims: RidClaims =
            serde_json::from_slice(&claims_json).map_err(|_| PrsError::InvalidRid)?;

        if claims.recipient_organization != recipient_org || claims.recipient_scope != recipient_scope
        {
            return Err(PrsError::InvalidRid);
        }

        let ura = UraNumber::parse_prefixed(recipient_org)?;
        let organisation = self
            .registry
            .organisation(&ura)
            .await?
            .ok_or(PrsError::OrganizationNotFound)?;

        if !policy::can_redeem(claims.usage, pseudonym_type, organisation.max_rid_usage) {
            metrics::counter!(METRICS_ID_POLICY_DENIED).increment(1);
            return Err(PrsError::PolicyDenied);
        }

        let personal_id: PersonalId = claims
            .personal_id
            .parse()
            .map_err(|_| PrsError::InvalidRid)?;

        let pseudonym_engine = PseudonymEngine::new(&self.master);
        let pseudonym = match pseudonym_type {
            UsageTier::Bsn => personal_id.canonical(),
            UsageTier::Rp => pseudonym_engine.generate_reversible(
                &personal_id,
                &claims.recipient_organization,
                &claims.recipient_scope,
            )?,
            UsageTier::Irp => pseudonym_engine.generate_irreversible(
                &personal_id,
                &claims.recipient_organization,
                &claims.recipient_scope,
            )?,
        };

        metrics::counter!(METRICS_ID_RID_REDEEMED).increment(1);
        Ok(ReceiveResponse {
            pseudonym,
            pseudonym_type,
        })
    }

    /// Evaluates the OPRF on a blinded input (spec §4.8.4).
    pub async fn oprf_evaluate(
        &self,
        blinded_input_b64: &str,
        recipient_org: &str,
        recipient_scope: &str,
    ) -> Result<String, PrsError> {
        let (_, pub_key) = self.resolve_recipient(recipient_org, recipient_scope).await?;

        let blinded_input = URL_SAFE_NO_PAD
            .decode(blinded_input_b64)
            .map_err(|_| PrsError::InvalidBlind)?;
        let evaluated = self.oprf.evaluate(&blinded_input)?;
        let subject = Pseudonym::OprfEval(URL_SAFE_NO_PAD.encode(evaluated)).to_string();

        let jwe = JweEnvelope::build(
            recipient_org,
            recipient_scope,
            &subject,
            &pub_key,
            Map::new(),
            self.jwe_validity_secs,
        )?;
        metrics::counter!(METRICS_ID_OPRF_SUCCESS).increment(1);
        Ok(jwe)
    }
}
