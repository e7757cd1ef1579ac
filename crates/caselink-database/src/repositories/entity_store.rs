//! PostgreSQL implementation of the entity store port.
//!
//! Reads join the person and provenance tables so entities come back fully
//! assembled. Writes of one batch run inside a single transaction; entities
//! are upserted by their stable external uuid, so a re-received batch updates
//! the existing rows instead of duplicating them. Entity rows reference their
//! person through a uuid subselect, since the person upsert keeps the id of an
//! already known row.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use caselink_core::error::{AppError, ErrorKind};
use caselink_core::result::AppResult;
use caselink_entity::case::Case;
use caselink_entity::contact::Contact;
use caselink_entity::person::Person;
use caselink_entity::sample::Sample;
use caselink_entity::share::OriginInfo;
use caselink_entity::symptoms::Symptoms;

use caselink_s2s::store::{EntityStore, WriteSet};

use super::map;

const CASE_SELECT: &str = "SELECT c.id, c.uuid, c.disease, c.case_classification, c.report_date, \
     c.symptoms, c.region, c.health_facility, c.change_date, \
     p.id AS person_id, p.uuid AS person_uuid, p.first_name, p.last_name, p.sex, \
     p.birth_date, p.phone, p.email_address, \
     o.id AS origin_id, o.creation_date AS origin_creation_date, \
     o.organization_id AS origin_organization_id, o.sender_name, o.sender_email, \
     o.sender_phone, o.ownership_handed_over, o.comment AS origin_comment \
     FROM cases c \
     JOIN persons p ON p.id = c.person_id \
     LEFT JOIN origin_info o ON o.id = c.origin_info_id";

const CONTACT_SELECT: &str = "SELECT c.id, c.uuid, c.case_uuid, c.disease, c.contact_classification, \
     c.contact_status, c.report_date, c.region, c.change_date, \
     p.id AS person_id, p.uuid AS person_uuid, p.first_name, p.last_name, p.sex, \
     p.birth_date, p.phone, p.email_address, \
     o.id AS origin_id, o.creation_date AS origin_creation_date, \
     o.organization_id AS origin_organization_id, o.sender_name, o.sender_email, \
     o.sender_phone, o.ownership_handed_over, o.comment AS origin_comment \
     FROM contacts c \
     JOIN persons p ON p.id = c.person_id \
     LEFT JOIN origin_info o ON o.id = c.origin_info_id";

const SAMPLE_SELECT: &str = "SELECT id, uuid, associated_case_uuid, associated_contact_uuid, \
     sample_material, sample_date, lab_name, change_date FROM samples";

/// Entity store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgEntityStore {
    pool: PgPool,
}

impl PgEntityStore {
    /// Create a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn cases_by_uuids(&self, uuids: &[String]) -> AppResult<Vec<Case>> {
        let rows: Vec<CaseRow> = sqlx::query_as(&format!("{CASE_SELECT} WHERE c.uuid = ANY($1)"))
            .bind(uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load cases", e))?;
        rows.into_iter().map(CaseRow::into_case).collect()
    }

    async fn contacts_by_uuids(&self, uuids: &[String]) -> AppResult<Vec<Contact>> {
        let rows: Vec<ContactRow> =
            sqlx::query_as(&format!("{CONTACT_SELECT} WHERE c.uuid = ANY($1)"))
                .bind(uuids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load contacts", e)
                })?;
        rows.into_iter().map(ContactRow::into_contact).collect()
    }

    async fn contacts_for_case(&self, case_uuid: &str) -> AppResult<Vec<Contact>> {
        let rows: Vec<ContactRow> = sqlx::query_as(&format!(
            "{CONTACT_SELECT} WHERE c.case_uuid = $1 ORDER BY c.uuid"
        ))
        .bind(case_uuid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load case contacts", e)
        })?;
        rows.into_iter().map(ContactRow::into_contact).collect()
    }

    async fn samples_for_case(&self, case_uuid: &str) -> AppResult<Vec<Sample>> {
        let rows: Vec<SampleRow> = sqlx::query_as(&format!(
            "{SAMPLE_SELECT} WHERE associated_case_uuid = $1 ORDER BY uuid"
        ))
        .bind(case_uuid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load case samples", e))?;
        rows.into_iter().map(SampleRow::into_sample).collect()
    }

    async fn samples_for_contact(&self, contact_uuid: &str) -> AppResult<Vec<Sample>> {
        let rows: Vec<SampleRow> = sqlx::query_as(&format!(
            "{SAMPLE_SELECT} WHERE associated_contact_uuid = $1 ORDER BY uuid"
        ))
        .bind(contact_uuid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load contact samples", e)
        })?;
        rows.into_iter().map(SampleRow::into_sample).collect()
    }

    async fn apply(&self, writes: WriteSet) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for case in &writes.cases {
            upsert_person(&mut tx, &case.person).await?;
            if let Some(origin) = &case.origin_info {
                upsert_origin(&mut tx, origin).await?;
            }
            upsert_case(&mut tx, case).await?;
        }
        for contact in &writes.contacts {
            upsert_person(&mut tx, &contact.person).await?;
            if let Some(origin) = &contact.origin_info {
                upsert_origin(&mut tx, origin).await?;
            }
            upsert_contact(&mut tx, contact).await?;
        }
        for sample in &writes.samples {
            upsert_sample(&mut tx, sample).await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }
}

async fn upsert_person(conn: &mut PgConnection, person: &Person) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO persons (id, uuid, first_name, last_name, sex, birth_date, phone, email_address) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (uuid) DO UPDATE SET \
         first_name = EXCLUDED.first_name, last_name = EXCLUDED.last_name, \
         sex = EXCLUDED.sex, birth_date = EXCLUDED.birth_date, \
         phone = EXCLUDED.phone, email_address = EXCLUDED.email_address",
    )
    .bind(person.id)
    .bind(&person.uuid)
    .bind(&person.first_name)
    .bind(&person.last_name)
    .bind(person.sex.map(map::sex_to_db))
    .bind(person.birth_date)
    .bind(&person.phone)
    .bind(&person.email_address)
    .execute(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert person", e))?;
    Ok(())
}

async fn upsert_origin(conn: &mut PgConnection, origin: &OriginInfo) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO origin_info (id, creation_date, organization_id, sender_name, sender_email, \
         sender_phone, ownership_handed_over, comment) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (id) DO UPDATE SET \
         organization_id = EXCLUDED.organization_id, sender_name = EXCLUDED.sender_name, \
         sender_email = EXCLUDED.sender_email, sender_phone = EXCLUDED.sender_phone, \
         ownership_handed_over = EXCLUDED.ownership_handed_over, comment = EXCLUDED.comment",
    )
    .bind(origin.id)
    .bind(origin.creation_date)
    .bind(&origin.organization_id)
    .bind(&origin.sender_name)
    .bind(&origin.sender_email)
    .bind(&origin.sender_phone)
    .bind(origin.ownership_handed_over)
    .bind(&origin.comment)
    .execute(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert provenance", e))?;
    Ok(())
}

async fn upsert_case(conn: &mut PgConnection, case: &Case) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO cases (id, uuid, disease, case_classification, report_date, person_id, \
         symptoms, region, health_facility, origin_info_id, change_date) \
         VALUES ($1, $2, $3, $4, $5, \
         (SELECT id FROM persons WHERE uuid = $6), $7, $8, $9, $10, $11) \
         ON CONFLICT (uuid) DO UPDATE SET \
         disease = EXCLUDED.disease, case_classification = EXCLUDED.case_classification, \
         report_date = EXCLUDED.report_date, symptoms = EXCLUDED.symptoms, \
         region = EXCLUDED.region, health_facility = EXCLUDED.health_facility, \
         origin_info_id = EXCLUDED.origin_info_id, change_date = EXCLUDED.change_date",
    )
    .bind(case.id)
    .bind(&case.uuid)
    .bind(map::disease_to_db(case.disease))
    .bind(map::case_classification_to_db(case.case_classification))
    .bind(case.report_date)
    .bind(&case.person.uuid)
    .bind(Json(&case.symptoms))
    .bind(&case.region)
    .bind(&case.health_facility)
    .bind(case.origin_info.as_ref().map(|o| o.id))
    .bind(case.change_date)
    .execute(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert case", e))?;
    Ok(())
}

async fn upsert_contact(conn: &mut PgConnection, contact: &Contact) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO contacts (id, uuid, case_uuid, disease, contact_classification, \
         contact_status, report_date, person_id, region, origin_info_id, change_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, \
         (SELECT id FROM persons WHERE uuid = $8), $9, $10, $11) \
         ON CONFLICT (uuid) DO UPDATE SET \
         case_uuid = EXCLUDED.case_uuid, disease = EXCLUDED.disease, \
         contact_classification = EXCLUDED.contact_classification, \
         contact_status = EXCLUDED.contact_status, report_date = EXCLUDED.report_date, \
         region = EXCLUDED.region, origin_info_id = EXCLUDED.origin_info_id, \
         change_date = EXCLUDED.change_date",
    )
    .bind(contact.id)
    .bind(&contact.uuid)
    .bind(&contact.case_uuid)
    .bind(map::disease_to_db(contact.disease))
    .bind(map::contact_classification_to_db(contact.contact_classification))
    .bind(map::contact_status_to_db(contact.contact_status))
    .bind(contact.report_date)
    .bind(&contact.person.uuid)
    .bind(&contact.region)
    .bind(contact.origin_info.as_ref().map(|o| o.id))
    .bind(contact.change_date)
    .execute(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert contact", e))?;
    Ok(())
}

async fn upsert_sample(conn: &mut PgConnection, sample: &Sample) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO samples (id, uuid, associated_case_uuid, associated_contact_uuid, \
         sample_material, sample_date, lab_name, change_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (uuid) DO UPDATE SET \
         associated_case_uuid = EXCLUDED.associated_case_uuid, \
         associated_contact_uuid = EXCLUDED.associated_contact_uuid, \
         sample_material = EXCLUDED.sample_material, sample_date = EXCLUDED.sample_date, \
         lab_name = EXCLUDED.lab_name, change_date = EXCLUDED.change_date",
    )
    .bind(sample.id)
    .bind(&sample.uuid)
    .bind(&sample.associated_case_uuid)
    .bind(&sample.associated_contact_uuid)
    .bind(map::sample_material_to_db(sample.sample_material))
    .bind(sample.sample_date)
    .bind(&sample.lab_name)
    .bind(sample.change_date)
    .execute(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert sample", e))?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct CaseRow {
    id: Uuid,
    uuid: String,
    disease: String,
    case_classification: String,
    report_date: DateTime<Utc>,
    symptoms: Json<Symptoms>,
    region: String,
    health_facility: Option<String>,
    change_date: DateTime<Utc>,
    person_id: Uuid,
    person_uuid: String,
    first_name: String,
    last_name: String,
    sex: Option<String>,
    birth_date: Option<NaiveDate>,
    phone: Option<String>,
    email_address: Option<String>,
    origin_id: Option<Uuid>,
    origin_creation_date: Option<DateTime<Utc>>,
    origin_organization_id: Option<String>,
    sender_name: Option<String>,
    sender_email: Option<String>,
    sender_phone: Option<String>,
    ownership_handed_over: Option<bool>,
    origin_comment: Option<String>,
}

impl CaseRow {
    fn into_case(self) -> AppResult<Case> {
        let origin_info = build_origin(OriginColumns {
            id: self.origin_id,
            creation_date: self.origin_creation_date,
            organization_id: self.origin_organization_id,
            sender_name: self.sender_name,
            sender_email: self.sender_email,
            sender_phone: self.sender_phone,
            ownership_handed_over: self.ownership_handed_over,
            comment: self.origin_comment,
        })?;

        Ok(Case {
            id: self.id,
            uuid: self.uuid,
            disease: map::disease_from_db(&self.disease)?,
            case_classification: map::case_classification_from_db(&self.case_classification)?,
            report_date: self.report_date,
            person: Person {
                id: self.person_id,
                uuid: self.person_uuid,
                first_name: self.first_name,
                last_name: self.last_name,
                sex: self.sex.as_deref().map(map::sex_from_db).transpose()?,
                birth_date: self.birth_date,
                phone: self.phone,
                email_address: self.email_address,
            },
            symptoms: self.symptoms.0,
            region: self.region,
            health_facility: self.health_facility,
            origin_info,
            change_date: self.change_date,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    uuid: String,
    case_uuid: Option<String>,
    disease: String,
    contact_classification: String,
    contact_status: String,
    report_date: DateTime<Utc>,
    region: String,
    change_date: DateTime<Utc>,
    person_id: Uuid,
    person_uuid: String,
    first_name: String,
    last_name: String,
    sex: Option<String>,
    birth_date: Option<NaiveDate>,
    phone: Option<String>,
    email_address: Option<String>,
    origin_id: Option<Uuid>,
    origin_creation_date: Option<DateTime<Utc>>,
    origin_organization_id: Option<String>,
    sender_name: Option<String>,
    sender_email: Option<String>,
    sender_phone: Option<String>,
    ownership_handed_over: Option<bool>,
    origin_comment: Option<String>,
}

impl ContactRow {
    fn into_contact(self) -> AppResult<Contact> {
        let origin_info = build_origin(OriginColumns {
            id: self.origin_id,
            creation_date: self.origin_creation_date,
            organization_id: self.origin_organization_id,
            sender_name: self.sender_name,
            sender_email: self.sender_email,
            sender_phone: self.sender_phone,
            ownership_handed_over: self.ownership_handed_over,
            comment: self.origin_comment,
        })?;

        Ok(Contact {
            id: self.id,
            uuid: self.uuid,
            case_uuid: self.case_uuid,
            disease: map::disease_from_db(&self.disease)?,
            contact_classification: map::contact_classification_from_db(
                &self.contact_classification,
            )?,
            contact_status: map::contact_status_from_db(&self.contact_status)?,
            report_date: self.report_date,
            person: Person {
                id: self.person_id,
                uuid: self.person_uuid,
                first_name: self.first_name,
                last_name: self.last_name,
                sex: self.sex.as_deref().map(map::sex_from_db).transpose()?,
                birth_date: self.birth_date,
                phone: self.phone,
                email_address: self.email_address,
            },
            region: self.region,
            origin_info,
            change_date: self.change_date,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SampleRow {
    id: Uuid,
    uuid: String,
    associated_case_uuid: Option<String>,
    associated_contact_uuid: Option<String>,
    sample_material: String,
    sample_date: DateTime<Utc>,
    lab_name: String,
    change_date: DateTime<Utc>,
}

impl SampleRow {
    fn into_sample(self) -> AppResult<Sample> {
        Ok(Sample {
            id: self.id,
            uuid: self.uuid,
            associated_case_uuid: self.associated_case_uuid,
            associated_contact_uuid: self.associated_contact_uuid,
            sample_material: map::sample_material_from_db(&self.sample_material)?,
            sample_date: self.sample_date,
            lab_name: self.lab_name,
            change_date: self.change_date,
        })
    }
}

/// Nullable provenance columns of a LEFT JOIN on `origin_info`.
struct OriginColumns {
    id: Option<Uuid>,
    creation_date: Option<DateTime<Utc>>,
    organization_id: Option<String>,
    sender_name: Option<String>,
    sender_email: Option<String>,
    sender_phone: Option<String>,
    ownership_handed_over: Option<bool>,
    comment: Option<String>,
}

fn build_origin(columns: OriginColumns) -> AppResult<Option<OriginInfo>> {
    let Some(id) = columns.id else {
        return Ok(None);
    };

    let (Some(creation_date), Some(organization_id), Some(sender_name), Some(handed_over)) = (
        columns.creation_date,
        columns.organization_id,
        columns.sender_name,
        columns.ownership_handed_over,
    ) else {
        return Err(AppError::database(
            "Provenance record is missing required columns",
        ));
    };

    Ok(Some(OriginInfo {
        id,
        creation_date,
        organization_id,
        sender_name,
        sender_email: columns.sender_email,
        sender_phone: columns.sender_phone,
        ownership_handed_over: handed_over,
        comment: columns.comment,
    }))
}
