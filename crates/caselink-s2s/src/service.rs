//! The sharing facade: outbound and inbound orchestration.
//!
//! Outbound: resolve and permission-check every entity before any network
//! I/O, build the packages, encrypt, POST, and only after confirmed remote
//! acceptance write the share-ledger rows — one per shared entity, all or
//! none. Inbound: decrypt, validate every entry accumulating errors, and
//! persist only when the whole batch validated ("validate-all-then-
//! persist-all").

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use caselink_core::types::validation::{case_group, contact_group};
use caselink_core::types::{PageRequest, PageResponse, ValidationErrors};
use caselink_directory::{DirectoryService, OrganizationRef};
use caselink_entity::share::{ShareInfo, ShareInfoCriteria, ShareTarget};
use caselink_entity::user::{User, UserRight};

use crate::builder::{CaseShareDataBuilder, ContactShareDataBuilder};
use crate::crypto::EncryptionService;
use crate::dto::{CaseShareDto, ContactShareDto};
use crate::error::{ShareError, ShareResult};
use crate::fields::FieldRegistry;
use crate::jurisdiction::JurisdictionCheck;
use crate::options::ShareOptions;
use crate::persister::{ProcessedCaseDataPersister, ProcessedContactDataPersister};
use crate::processor::{SharedCaseProcessor, SharedContactProcessor};
use crate::pseudonymizer::Pseudonymizer;
use crate::store::{EntityStore, ShareLedger};
use crate::transport::TransportClient;
use crate::wire::ShareEnvelope;

/// Path on the counterpart instance that accepts case packages.
pub const SAVE_SHARED_CASES_PATH: &str = "/v1/shares/cases";
/// Path on the counterpart instance that accepts contact packages.
pub const SAVE_SHARED_CONTACTS_PATH: &str = "/v1/shares/contacts";

/// Facade for inter-instance sharing.
pub struct SharingService {
    directory: Arc<DirectoryService>,
    encryption: Arc<EncryptionService>,
    transport: Arc<dyn TransportClient>,
    store: Arc<dyn EntityStore>,
    ledger: Arc<dyn ShareLedger>,
    jurisdiction: Arc<dyn JurisdictionCheck>,
    case_builder: CaseShareDataBuilder,
    contact_builder: ContactShareDataBuilder,
    case_processor: SharedCaseProcessor,
    contact_processor: SharedContactProcessor,
    case_persister: ProcessedCaseDataPersister,
    contact_persister: ProcessedContactDataPersister,
    service_user_name: String,
}

impl SharingService {
    /// Create the facade with all collaborators injected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        directory: Arc<DirectoryService>,
        encryption: Arc<EncryptionService>,
        transport: Arc<dyn TransportClient>,
        store: Arc<dyn EntityStore>,
        ledger: Arc<dyn ShareLedger>,
        jurisdiction: Arc<dyn JurisdictionCheck>,
        pseudonymizer: Arc<dyn Pseudonymizer>,
        service_user_name: impl Into<String>,
    ) -> Self {
        let fields = Arc::new(FieldRegistry::standard());
        let own_id = directory.own_organization_id().to_string();

        Self {
            case_builder: CaseShareDataBuilder::new(
                Arc::clone(&store),
                fields,
                Arc::clone(&pseudonymizer),
                own_id.clone(),
            ),
            contact_builder: ContactShareDataBuilder::new(
                Arc::clone(&store),
                pseudonymizer,
                own_id,
            ),
            case_processor: SharedCaseProcessor,
            contact_processor: SharedContactProcessor,
            case_persister: ProcessedCaseDataPersister::new(Arc::clone(&store)),
            contact_persister: ProcessedContactDataPersister::new(Arc::clone(&store)),
            directory,
            encryption,
            transport,
            store,
            ledger,
            jurisdiction,
            service_user_name: service_user_name.into(),
        }
    }

    /// Share the given cases with another organization.
    ///
    /// Permission failures abort the whole batch before any network I/O.
    /// Ledger rows are written only after the remote instance accepted the
    /// batch, one row per case, linked contact, and sample.
    pub async fn share_cases(
        &self,
        user: &User,
        case_uuids: &[String],
        options: &ShareOptions,
    ) -> ShareResult<()> {
        let cases = self.store.cases_by_uuids(case_uuids).await?;

        let mut errors = ValidationErrors::new();
        for uuid in case_uuids {
            if !cases.iter().any(|c| &c.uuid == uuid) {
                errors.add(case_group(uuid), "case", "Case not found");
            }
        }
        for case in &cases {
            if !self.jurisdiction.is_case_edit_allowed(case, user) {
                errors.add(
                    case_group(&case.uuid),
                    "case",
                    "Case is not editable by the sharing user",
                );
            }
        }
        if !errors.is_empty() {
            return Err(ShareError::validation("Sharing the selected cases failed", errors));
        }

        let mut entities_to_send: Vec<CaseShareDto> = Vec::with_capacity(cases.len());
        let mut shared_contacts = Vec::new();
        let mut shared_samples = Vec::new();

        for case in &cases {
            let share_data = self.case_builder.build_share_data(case, user, options).await?;
            entities_to_send.push(share_data.dto);
            shared_contacts.extend(share_data.associated_contacts);
            shared_samples.extend(share_data.samples);
        }

        self.send_entities(&entities_to_send, SAVE_SHARED_CASES_PATH, options)
            .await?;

        let mut rows = Vec::new();
        for case in &cases {
            rows.push(self.new_share_info(user, options, ShareTarget::Case(case.uuid.clone())));
        }
        for contact in &shared_contacts {
            rows.push(self.new_share_info(user, options, ShareTarget::Contact(contact.uuid.clone())));
        }
        for sample in &shared_samples {
            rows.push(self.new_share_info(user, options, ShareTarget::Sample(sample.uuid.clone())));
        }
        self.ledger.append(rows).await?;

        info!(
            target_organization = %options.organization_id,
            cases = cases.len(),
            contacts = shared_contacts.len(),
            samples = shared_samples.len(),
            "Shared cases with another instance"
        );

        Ok(())
    }

    /// Share the given contacts with another organization.
    pub async fn share_contacts(
        &self,
        user: &User,
        contact_uuids: &[String],
        options: &ShareOptions,
    ) -> ShareResult<()> {
        let contacts = self.store.contacts_by_uuids(contact_uuids).await?;

        let mut errors = ValidationErrors::new();
        for uuid in contact_uuids {
            if !contacts.iter().any(|c| &c.uuid == uuid) {
                errors.add(contact_group(uuid), "contact", "Contact not found");
            }
        }
        for contact in &contacts {
            if !self.jurisdiction.is_contact_edit_allowed(contact, user) {
                errors.add(
                    contact_group(&contact.uuid),
                    "contact",
                    "Contact is not editable by the sharing user",
                );
            }
        }
        if !errors.is_empty() {
            return Err(ShareError::validation(
                "Sharing the selected contacts failed",
                errors,
            ));
        }

        let mut entities_to_send: Vec<ContactShareDto> = Vec::with_capacity(contacts.len());
        let mut shared_samples = Vec::new();

        for contact in &contacts {
            let share_data = self
                .contact_builder
                .build_share_data(contact, user, options)
                .await?;
            entities_to_send.push(share_data.dto);
            shared_samples.extend(share_data.samples);
        }

        self.send_entities(&entities_to_send, SAVE_SHARED_CONTACTS_PATH, options)
            .await?;

        let mut rows = Vec::new();
        for contact in &contacts {
            rows.push(self.new_share_info(user, options, ShareTarget::Contact(contact.uuid.clone())));
        }
        for sample in &shared_samples {
            rows.push(self.new_share_info(user, options, ShareTarget::Sample(sample.uuid.clone())));
        }
        self.ledger.append(rows).await?;

        info!(
            target_organization = %options.organization_id,
            contacts = contacts.len(),
            samples = shared_samples.len(),
            "Shared contacts with another instance"
        );

        Ok(())
    }

    /// Absorb an inbound case package.
    ///
    /// Either every entry of the batch is persisted, or — on any validation
    /// failure — none is, and the aggregated errors are returned.
    pub async fn save_shared_cases(&self, envelope: &ShareEnvelope) -> ShareResult<()> {
        let shared_cases: Vec<CaseShareDto> = self.decrypt_shared_data(envelope)?;

        let mut errors = ValidationErrors::new();
        let mut cases_to_save = Vec::with_capacity(shared_cases.len());

        for shared_case in &shared_cases {
            match self
                .case_processor
                .process_shared_data(shared_case, &envelope.sender_organization_id)
            {
                Ok(processed) => cases_to_save.push(processed),
                Err(entry_errors) => errors.extend(entry_errors),
            }
        }

        if !errors.is_empty() {
            return Err(ShareError::validation("Shared cases are invalid", errors));
        }

        let saved = cases_to_save.len();
        self.case_persister.persist_batch(cases_to_save).await?;

        info!(
            sender_organization = %envelope.sender_organization_id,
            cases = saved,
            "Absorbed shared cases"
        );

        Ok(())
    }

    /// Absorb an inbound contact package. Same batch semantics as
    /// [`Self::save_shared_cases`].
    pub async fn save_shared_contacts(&self, envelope: &ShareEnvelope) -> ShareResult<()> {
        let shared_contacts: Vec<ContactShareDto> = self.decrypt_shared_data(envelope)?;

        let mut errors = ValidationErrors::new();
        let mut contacts_to_save = Vec::with_capacity(shared_contacts.len());

        for shared_contact in &shared_contacts {
            match self
                .contact_processor
                .process_shared_data(shared_contact, &envelope.sender_organization_id)
            {
                Ok(processed) => contacts_to_save.push(processed),
                Err(entry_errors) => errors.extend(entry_errors),
            }
        }

        if !errors.is_empty() {
            return Err(ShareError::validation("Shared contacts are invalid", errors));
        }

        let saved = contacts_to_save.len();
        self.contact_persister.persist_batch(contacts_to_save).await?;

        info!(
            sender_organization = %envelope.sender_organization_id,
            contacts = saved,
            "Absorbed shared contacts"
        );

        Ok(())
    }

    /// List share-ledger rows matching the criteria.
    pub async fn share_info_list(
        &self,
        criteria: &ShareInfoCriteria,
        page: &PageRequest,
    ) -> ShareResult<PageResponse<ShareInfo>> {
        Ok(self.ledger.list(criteria, page).await?)
    }

    /// All organizations available as share targets.
    pub fn organization_refs(&self) -> Vec<OrganizationRef> {
        self.directory.list_organizations()
    }

    /// Reference to one organization, if known.
    pub fn organization_ref(&self, id: &str) -> Option<OrganizationRef> {
        self.directory.resolve(id).map(|org| org.to_reference())
    }

    /// Whether sharing is available to the given user: requires the share
    /// right and at least one configured counterpart organization.
    pub fn is_feature_enabled(&self, user: &User) -> bool {
        user.has_right(UserRight::InstanceShare) && !self.directory.is_empty()
    }

    fn decrypt_shared_data<T: serde::de::DeserializeOwned>(
        &self,
        envelope: &ShareEnvelope,
    ) -> ShareResult<Vec<T>> {
        let plaintext = self
            .encryption
            .decrypt(&envelope.data, &envelope.sender_organization_id)?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| ShareError::Crypto(format!("Could not parse shared data: {e}")))
    }

    async fn send_entities<T: serde::Serialize>(
        &self,
        entities: &[T],
        endpoint: &str,
        options: &ShareOptions,
    ) -> ShareResult<()> {
        let target = self.directory.resolve(&options.organization_id).ok_or_else(|| {
            ShareError::Configuration(format!(
                "Unknown target organization {}",
                options.organization_id
            ))
        })?;

        let payload = serde_json::to_vec(entities)
            .map_err(|e| ShareError::Processing(format!("Could not serialize share data: {e}")))?;
        let ciphertext = self.encryption.encrypt(&payload, &target.id)?;

        let envelope = ShareEnvelope::new(self.directory.own_organization_id(), ciphertext);
        let credentials = format!("{}:{}", self.service_user_name, target.rest_user_password);
        let auth_header = format!("Basic {}", BASE64.encode(credentials));

        self.transport
            .post(&target.host_name, endpoint, &auth_header, &envelope)
            .await
    }

    fn new_share_info(&self, user: &User, options: &ShareOptions, target: ShareTarget) -> ShareInfo {
        ShareInfo {
            id: Uuid::new_v4(),
            creation_date: Utc::now(),
            organization_id: options.organization_id.clone(),
            ownership_handed_over: options.hand_over_ownership,
            sender_user_uuid: user.uuid.clone(),
            comment: options.comment.clone(),
            target,
        }
    }
}
