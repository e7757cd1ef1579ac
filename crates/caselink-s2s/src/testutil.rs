//! In-memory fakes and fixtures shared by the protocol tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use crypto_box::SecretKey;
use crypto_box::aead::OsRng;
use uuid::Uuid;

use caselink_core::AppResult;
use caselink_core::config::sharing::{OrganizationEntry, SharingConfig};
use caselink_core::types::{PageRequest, PageResponse};
use caselink_directory::DirectoryService;
use caselink_entity::case::{Case, CaseClassification, Disease};
use caselink_entity::contact::{Contact, ContactClassification, ContactStatus};
use caselink_entity::person::Person;
use caselink_entity::sample::{Sample, SampleMaterial};
use caselink_entity::share::{ShareInfo, ShareInfoCriteria};
use caselink_entity::symptoms::Symptoms;
use caselink_entity::user::{User, UserRight};

use crate::crypto::EncryptionService;
use crate::dto::{
    CaseDataDto, CaseShareDto, ContactDataDto, ContactShareDto, OriginInfoDto, PersonDto,
    SampleDto,
};
use crate::error::{ShareError, ShareResult};
use crate::jurisdiction::RegionJurisdictionCheck;
use crate::pseudonymizer::DefaultPseudonymizer;
use crate::service::SharingService;
use crate::store::{EntityStore, ShareLedger, WriteSet};
use crate::transport::TransportClient;
use crate::wire::{ErrorResponse, ShareEnvelope};

/// In-memory entity store keyed by external uuid.
#[derive(Default)]
pub struct MemoryStore {
    cases: Mutex<HashMap<String, Case>>,
    contacts: Mutex<HashMap<String, Contact>>,
    samples: Mutex<HashMap<String, Sample>>,
}

impl MemoryStore {
    pub fn insert_case(&self, case: Case) {
        self.cases.lock().unwrap().insert(case.uuid.clone(), case);
    }

    pub fn insert_contact(&self, contact: Contact) {
        self.contacts
            .lock()
            .unwrap()
            .insert(contact.uuid.clone(), contact);
    }

    pub fn insert_sample(&self, sample: Sample) {
        self.samples
            .lock()
            .unwrap()
            .insert(sample.uuid.clone(), sample);
    }

    pub fn case(&self, uuid: &str) -> Option<Case> {
        self.cases.lock().unwrap().get(uuid).cloned()
    }

    pub fn contact(&self, uuid: &str) -> Option<Contact> {
        self.contacts.lock().unwrap().get(uuid).cloned()
    }

    pub fn case_count(&self) -> usize {
        self.cases.lock().unwrap().len()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.lock().unwrap().len()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.lock().unwrap().len()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn cases_by_uuids(&self, uuids: &[String]) -> AppResult<Vec<Case>> {
        let cases = self.cases.lock().unwrap();
        Ok(uuids.iter().filter_map(|u| cases.get(u).cloned()).collect())
    }

    async fn contacts_by_uuids(&self, uuids: &[String]) -> AppResult<Vec<Contact>> {
        let contacts = self.contacts.lock().unwrap();
        Ok(uuids
            .iter()
            .filter_map(|u| contacts.get(u).cloned())
            .collect())
    }

    async fn contacts_for_case(&self, case_uuid: &str) -> AppResult<Vec<Contact>> {
        let contacts = self.contacts.lock().unwrap();
        let mut found: Vec<Contact> = contacts
            .values()
            .filter(|c| c.case_uuid.as_deref() == Some(case_uuid))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.uuid.cmp(&b.uuid));
        Ok(found)
    }

    async fn samples_for_case(&self, case_uuid: &str) -> AppResult<Vec<Sample>> {
        let samples = self.samples.lock().unwrap();
        let mut found: Vec<Sample> = samples
            .values()
            .filter(|s| s.associated_case_uuid.as_deref() == Some(case_uuid))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.uuid.cmp(&b.uuid));
        Ok(found)
    }

    async fn samples_for_contact(&self, contact_uuid: &str) -> AppResult<Vec<Sample>> {
        let samples = self.samples.lock().unwrap();
        let mut found: Vec<Sample> = samples
            .values()
            .filter(|s| s.associated_contact_uuid.as_deref() == Some(contact_uuid))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.uuid.cmp(&b.uuid));
        Ok(found)
    }

    async fn apply(&self, writes: WriteSet) -> AppResult<()> {
        let mut cases = self.cases.lock().unwrap();
        let mut contacts = self.contacts.lock().unwrap();
        let mut samples = self.samples.lock().unwrap();
        for case in writes.cases {
            cases.insert(case.uuid.clone(), case);
        }
        for contact in writes.contacts {
            contacts.insert(contact.uuid.clone(), contact);
        }
        for sample in writes.samples {
            samples.insert(sample.uuid.clone(), sample);
        }
        Ok(())
    }
}

/// In-memory share ledger.
#[derive(Default)]
pub struct MemoryLedger {
    rows: Mutex<Vec<ShareInfo>>,
}

impl MemoryLedger {
    pub fn rows(&self) -> Vec<ShareInfo> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShareLedger for MemoryLedger {
    async fn append(&self, mut new_rows: Vec<ShareInfo>) -> AppResult<()> {
        self.rows.lock().unwrap().append(&mut new_rows);
        Ok(())
    }

    async fn list(
        &self,
        criteria: &ShareInfoCriteria,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareInfo>> {
        let rows = self.rows.lock().unwrap();
        let matching: Vec<ShareInfo> = rows
            .iter()
            .filter(|row| criteria.matches(row))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}

/// What the mock transport should do with the next request.
pub enum TransportBehavior {
    Accept,
    Reject(ErrorResponse),
    ConnectionRefused,
}

/// Transport client recording calls and returning a scripted outcome.
pub struct MockTransport {
    pub behavior: Mutex<TransportBehavior>,
    pub calls: AtomicUsize,
    pub last_path: Mutex<Option<String>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            behavior: Mutex::new(TransportBehavior::Accept),
            calls: AtomicUsize::new(0),
            last_path: Mutex::new(None),
        }
    }
}

impl MockTransport {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_behavior(&self, behavior: TransportBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }
}

#[async_trait]
impl TransportClient for MockTransport {
    async fn post(
        &self,
        _host: &str,
        path: &str,
        _auth_header: &str,
        _envelope: &ShareEnvelope,
    ) -> ShareResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_path.lock().unwrap() = Some(path.to_string());
        match &*self.behavior.lock().unwrap() {
            TransportBehavior::Accept => Ok(()),
            TransportBehavior::Reject(response) => Err(ShareError::validation(
                response.message.clone(),
                response.errors.clone(),
            )),
            TransportBehavior::ConnectionRefused => {
                Err(ShareError::Connection("connection refused".to_string()))
            }
        }
    }
}

/// A fully wired sharing instance ("org-a") that knows one peer ("org-b"),
/// plus encryption services to forge inbound traffic.
pub struct TestInstance {
    pub service: SharingService,
    pub store: Arc<MemoryStore>,
    pub ledger: Arc<MemoryLedger>,
    pub transport: Arc<MockTransport>,
    /// Encrypts as the legitimate peer org-b.
    pub peer_encryption: EncryptionService,
    /// Encrypts claiming to be org-b but with a key the instance does not
    /// know.
    pub rogue_encryption: EncryptionService,
}

pub fn test_instance() -> TestInstance {
    let own_secret = SecretKey::generate(&mut OsRng);
    let peer_secret = SecretKey::generate(&mut OsRng);
    let rogue_secret = SecretKey::generate(&mut OsRng);

    let own_config = sharing_config(
        "org-a",
        &own_secret,
        vec![("org-b", peer_secret.public_key().as_bytes())],
    );
    let peer_config = sharing_config(
        "org-b",
        &peer_secret,
        vec![("org-a", own_secret.public_key().as_bytes())],
    );
    let rogue_config = sharing_config(
        "org-b",
        &rogue_secret,
        vec![("org-a", own_secret.public_key().as_bytes())],
    );

    let directory = Arc::new(DirectoryService::from_config(&own_config).unwrap());
    let encryption =
        Arc::new(EncryptionService::from_config(&own_config, Arc::clone(&directory)).unwrap());

    let peer_directory = Arc::new(DirectoryService::from_config(&peer_config).unwrap());
    let peer_encryption = EncryptionService::from_config(&peer_config, peer_directory).unwrap();

    let rogue_directory = Arc::new(DirectoryService::from_config(&rogue_config).unwrap());
    let rogue_encryption = EncryptionService::from_config(&rogue_config, rogue_directory).unwrap();

    let store = Arc::new(MemoryStore::default());
    let ledger = Arc::new(MemoryLedger::default());
    let transport = Arc::new(MockTransport::default());

    let service = SharingService::new(
        directory,
        encryption,
        Arc::clone(&transport) as Arc<dyn TransportClient>,
        Arc::clone(&store) as Arc<dyn EntityStore>,
        Arc::clone(&ledger) as Arc<dyn ShareLedger>,
        Arc::new(RegionJurisdictionCheck),
        Arc::new(DefaultPseudonymizer),
        "s2s-service",
    );

    TestInstance {
        service,
        store,
        ledger,
        transport,
        peer_encryption,
        rogue_encryption,
    }
}

fn sharing_config(
    own_id: &str,
    own_secret: &SecretKey,
    peers: Vec<(&str, &[u8; 32])>,
) -> SharingConfig {
    SharingConfig {
        own_organization_id: own_id.to_string(),
        own_organization_name: own_id.to_string(),
        own_secret_key: BASE64.encode(own_secret.to_bytes()),
        service_user_name: "s2s-service".to_string(),
        request_timeout_seconds: 30,
        organizations: peers
            .into_iter()
            .map(|(id, key)| OrganizationEntry {
                id: id.to_string(),
                name: id.to_string(),
                host_name: format!("{id}.example.org"),
                rest_user_password: "secret".to_string(),
                public_key: BASE64.encode(key),
            })
            .collect(),
    }
}

pub fn sharing_user(region: &str) -> User {
    User {
        id: Uuid::new_v4(),
        uuid: "user-1".to_string(),
        name: "Test User".to_string(),
        email: Some("user@example.org".to_string()),
        phone: None,
        region: region.to_string(),
        rights: vec![
            UserRight::CaseEdit,
            UserRight::ContactEdit,
            UserRight::InstanceShare,
        ],
    }
}

pub fn local_case(uuid: &str, region: &str) -> Case {
    Case {
        id: Uuid::new_v4(),
        uuid: uuid.to_string(),
        disease: Disease::Covid19,
        case_classification: CaseClassification::Confirmed,
        report_date: Utc::now(),
        person: Person::new("Ada", "Lovelace"),
        symptoms: Symptoms::default(),
        region: region.to_string(),
        health_facility: None,
        origin_info: None,
        change_date: Utc::now(),
    }
}

pub fn contact_for_case(uuid: &str, case_uuid: &str, region: &str) -> Contact {
    Contact {
        id: Uuid::new_v4(),
        uuid: uuid.to_string(),
        case_uuid: Some(case_uuid.to_string()),
        disease: Disease::Covid19,
        contact_classification: ContactClassification::Confirmed,
        contact_status: ContactStatus::Active,
        report_date: Utc::now(),
        person: Person::new("Grace", "Hopper"),
        region: region.to_string(),
        origin_info: None,
        change_date: Utc::now(),
    }
}

pub fn sample_for_case(uuid: &str, case_uuid: &str) -> Sample {
    Sample {
        id: Uuid::new_v4(),
        uuid: uuid.to_string(),
        associated_case_uuid: Some(case_uuid.to_string()),
        associated_contact_uuid: None,
        sample_material: SampleMaterial::NasalSwab,
        sample_date: Utc::now(),
        lab_name: "Central Lab".to_string(),
        change_date: Utc::now(),
    }
}

pub fn person_dto(uuid: &str) -> PersonDto {
    PersonDto {
        uuid: uuid.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        sex: None,
        birth_date: None,
        phone: None,
        email_address: None,
    }
}

pub fn origin_info_dto(organization_id: &str, handed_over: bool) -> OriginInfoDto {
    OriginInfoDto {
        organization_id: organization_id.to_string(),
        sender_name: "Dr. Sender".to_string(),
        sender_email: Some("sender@example.org".to_string()),
        sender_phone: None,
        ownership_handed_over: handed_over,
        comment: Some("for follow-up".to_string()),
    }
}

pub fn case_share_dto(uuid: &str, sender_org: &str) -> CaseShareDto {
    CaseShareDto {
        case: CaseDataDto {
            uuid: uuid.to_string(),
            disease: Disease::Covid19,
            case_classification: CaseClassification::Confirmed,
            report_date: Utc::now(),
            region: "north".to_string(),
            health_facility: None,
            person: person_dto(&format!("person-{uuid}")),
            symptoms: Symptoms::default(),
        },
        associated_contacts: Vec::new(),
        samples: Vec::new(),
        origin_info: origin_info_dto(sender_org, false),
    }
}

pub fn contact_share_dto(uuid: &str, sender_org: &str) -> ContactShareDto {
    ContactShareDto {
        contact: ContactDataDto {
            uuid: uuid.to_string(),
            case_uuid: None,
            disease: Disease::Covid19,
            contact_classification: ContactClassification::Confirmed,
            contact_status: ContactStatus::Active,
            report_date: Utc::now(),
            region: "north".to_string(),
            person: person_dto(&format!("person-{uuid}")),
        },
        samples: Vec::new(),
        origin_info: origin_info_dto(sender_org, false),
    }
}

pub fn sample_dto_for_case(uuid: &str, case_uuid: &str) -> SampleDto {
    SampleDto {
        uuid: uuid.to_string(),
        associated_case_uuid: Some(case_uuid.to_string()),
        associated_contact_uuid: None,
        sample_material: SampleMaterial::Blood,
        sample_date: Utc::now(),
        lab_name: "Central Lab".to_string(),
    }
}

/// Build an inbound envelope as the given sender encryption service,
/// claiming `sender_org`, with the payload encrypted for org-a.
pub fn inbound_envelope<T: serde::Serialize>(
    sender: &EncryptionService,
    sender_org: &str,
    payload: &[T],
) -> ShareEnvelope {
    let bytes = serde_json::to_vec(payload).unwrap();
    let ciphertext = sender.encrypt(&bytes, "org-a").unwrap();
    ShareEnvelope::new(sender_org, ciphertext)
}
