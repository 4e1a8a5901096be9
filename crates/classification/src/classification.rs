use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taxclass_core::{Aggregate, AggregateRoot, ClassificationId, CompanyId, DomainError};
use taxclass_events::Event;

use crate::naming::MAX_NAME_LENGTH;
use crate::tax_set::{ClassificationKey, TaxSet};

fn persisted() -> bool {
    true
}

/// Aggregate root: FiscalClassification.
///
/// Products are not part of the aggregate; they point at it, and the reverse set
/// is computed on demand by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalClassification {
    id: ClassificationId,
    name: String,
    #[serde(default)]
    company_id: Option<CompanyId>,
    #[serde(default = "persisted")]
    active: bool,
    #[serde(default)]
    sale_tax_ids: TaxSet,
    #[serde(default)]
    purchase_tax_ids: TaxSet,
    #[serde(default)]
    version: u64,
    // Anything read back from storage exists.
    #[serde(skip_serializing, default = "persisted")]
    created: bool,
}

impl FiscalClassification {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: ClassificationId) -> Self {
        Self {
            id,
            name: String::new(),
            company_id: None,
            active: true,
            sale_tax_ids: TaxSet::new(),
            purchase_tax_ids: TaxSet::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ClassificationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn sale_tax_ids(&self) -> &TaxSet {
        &self.sale_tax_ids
    }

    pub fn purchase_tax_ids(&self) -> &TaxSet {
        &self.purchase_tax_ids
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// The (company, sale, purchase) combination this classification stands for.
    pub fn key(&self) -> ClassificationKey {
        ClassificationKey {
            company_id: self.company_id,
            sale_tax_ids: self.sale_tax_ids.clone(),
            purchase_tax_ids: self.purchase_tax_ids.clone(),
        }
    }

    /// Exact match on company scope and both tax sets.
    pub fn matches(&self, key: &ClassificationKey) -> bool {
        self.company_id == key.company_id
            && self.sale_tax_ids == key.sale_tax_ids
            && self.purchase_tax_ids == key.purchase_tax_ids
    }
}

impl AggregateRoot for FiscalClassification {
    type Id = ClassificationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Partial update of a classification. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationChanges {
    pub name: Option<String>,
    /// `Some(None)` moves the classification to the all-companies scope.
    pub company_id: Option<Option<CompanyId>>,
    pub active: Option<bool>,
    pub sale_tax_ids: Option<TaxSet>,
    pub purchase_tax_ids: Option<TaxSet>,
}

impl ClassificationChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.company_id.is_none()
            && self.active.is_none()
            && self.sale_tax_ids.is_none()
            && self.purchase_tax_ids.is_none()
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn set_active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }

    pub fn set_taxes(sale_tax_ids: TaxSet, purchase_tax_ids: TaxSet) -> Self {
        Self {
            sale_tax_ids: Some(sale_tax_ids),
            purchase_tax_ids: Some(purchase_tax_ids),
            ..Self::default()
        }
    }
}

/// Command: CreateClassification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClassification {
    pub classification_id: ClassificationId,
    pub name: String,
    pub company_id: Option<CompanyId>,
    pub active: bool,
    pub sale_tax_ids: TaxSet,
    pub purchase_tax_ids: TaxSet,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateClassification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateClassification {
    pub classification_id: ClassificationId,
    pub changes: ClassificationChanges,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationCommand {
    CreateClassification(CreateClassification),
    UpdateClassification(UpdateClassification),
}

/// Event: ClassificationCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCreated {
    pub classification_id: ClassificationId,
    pub name: String,
    pub company_id: Option<CompanyId>,
    pub active: bool,
    pub sale_tax_ids: TaxSet,
    pub purchase_tax_ids: TaxSet,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ClassificationUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationUpdated {
    pub classification_id: ClassificationId,
    pub changes: ClassificationChanges,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationEvent {
    ClassificationCreated(ClassificationCreated),
    ClassificationUpdated(ClassificationUpdated),
}

impl Event for ClassificationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ClassificationEvent::ClassificationCreated(_) => "fiscal.classification.created",
            ClassificationEvent::ClassificationUpdated(_) => "fiscal.classification.updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ClassificationEvent::ClassificationCreated(e) => e.occurred_at,
            ClassificationEvent::ClassificationUpdated(e) => e.occurred_at,
        }
    }
}

impl Aggregate for FiscalClassification {
    type Command = ClassificationCommand;
    type Event = ClassificationEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ClassificationEvent::ClassificationCreated(e) => {
                self.id = e.classification_id;
                self.name = e.name.clone();
                self.company_id = e.company_id;
                self.active = e.active;
                self.sale_tax_ids = e.sale_tax_ids.clone();
                self.purchase_tax_ids = e.purchase_tax_ids.clone();
                self.created = true;
            }
            ClassificationEvent::ClassificationUpdated(e) => {
                let changes = &e.changes;
                if let Some(name) = &changes.name {
                    self.name = name.clone();
                }
                if let Some(company_id) = changes.company_id {
                    self.company_id = company_id;
                }
                if let Some(active) = changes.active {
                    self.active = active;
                }
                if let Some(sale) = &changes.sale_tax_ids {
                    self.sale_tax_ids = sale.clone();
                }
                if let Some(purchase) = &changes.purchase_tax_ids {
                    self.purchase_tax_ids = purchase.clone();
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ClassificationCommand::CreateClassification(cmd) => self.handle_create(cmd),
            ClassificationCommand::UpdateClassification(cmd) => self.handle_update(cmd),
        }
    }
}

impl FiscalClassification {
    fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        let len = name.chars().count();
        if len > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "name is {len} characters long (max {MAX_NAME_LENGTH})"
            )));
        }
        Ok(())
    }

    fn handle_create(
        &self,
        cmd: &CreateClassification,
    ) -> Result<Vec<ClassificationEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("classification already exists"));
        }
        Self::validate_name(&cmd.name)?;

        Ok(vec![ClassificationEvent::ClassificationCreated(ClassificationCreated {
            classification_id: cmd.classification_id,
            name: cmd.name.clone(),
            company_id: cmd.company_id,
            active: cmd.active,
            sale_tax_ids: cmd.sale_tax_ids.clone(),
            purchase_tax_ids: cmd.purchase_tax_ids.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(
        &self,
        cmd: &UpdateClassification,
    ) -> Result<Vec<ClassificationEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.id != cmd.classification_id {
            return Err(DomainError::invariant("classification_id mismatch"));
        }
        if let Some(name) = &cmd.changes.name {
            Self::validate_name(name)?;
        }
        if cmd.changes.is_empty() {
            return Ok(vec![]);
        }

        Ok(vec![ClassificationEvent::ClassificationUpdated(ClassificationUpdated {
            classification_id: cmd.classification_id,
            changes: cmd.changes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxclass_core::TaxId;

    fn create_cmd(id: ClassificationId, name: &str) -> CreateClassification {
        CreateClassification {
            classification_id: id,
            name: name.to_string(),
            company_id: None,
            active: true,
            sale_tax_ids: [TaxId::new()].into_iter().collect(),
            purchase_tax_ids: TaxSet::new(),
            occurred_at: Utc::now(),
        }
    }

    fn created(name: &str) -> FiscalClassification {
        let id = ClassificationId::new();
        let mut fc = FiscalClassification::empty(id);
        let events = fc
            .handle(&ClassificationCommand::CreateClassification(create_cmd(id, name)))
            .unwrap();
        fc.apply(&events[0]);
        fc
    }

    #[test]
    fn create_emits_created_event_and_applies_state() {
        let id = ClassificationId::new();
        let mut fc = FiscalClassification::empty(id);
        let cmd = create_cmd(id, "Food");

        let events = fc
            .handle(&ClassificationCommand::CreateClassification(cmd.clone()))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "fiscal.classification.created");

        fc.apply(&events[0]);
        assert!(fc.is_created());
        assert_eq!(fc.name(), "Food");
        assert_eq!(fc.sale_tax_ids(), &cmd.sale_tax_ids);
        assert!(fc.is_active());
        assert_eq!(fc.version(), 1);
    }

    #[test]
    fn create_rejects_blank_name() {
        let id = ClassificationId::new();
        let fc = FiscalClassification::empty(id);
        let err = fc
            .handle(&ClassificationCommand::CreateClassification(create_cmd(id, "  ")))
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank name"),
        }
    }

    #[test]
    fn create_rejects_overlong_name() {
        let id = ClassificationId::new();
        let fc = FiscalClassification::empty(id);
        let name = "n".repeat(MAX_NAME_LENGTH + 1);
        let err = fc
            .handle(&ClassificationCommand::CreateClassification(create_cmd(id, &name)))
            .unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("257")),
            _ => panic!("Expected Validation error for long name"),
        }
    }

    #[test]
    fn create_twice_is_a_conflict() {
        let fc = created("Food");
        let err = fc
            .handle(&ClassificationCommand::CreateClassification(create_cmd(
                fc.id_typed(),
                "Food",
            )))
            .unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error"),
        }
    }

    #[test]
    fn update_on_missing_classification_is_not_found() {
        let id = ClassificationId::new();
        let fc = FiscalClassification::empty(id);
        let cmd = UpdateClassification {
            classification_id: id,
            changes: ClassificationChanges::rename("Other"),
            occurred_at: Utc::now(),
        };
        let err = fc
            .handle(&ClassificationCommand::UpdateClassification(cmd))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn update_applies_only_given_fields() {
        let mut fc = created("Food");
        let sale_before = fc.sale_tax_ids().clone();
        let company = CompanyId::new();

        let cmd = UpdateClassification {
            classification_id: fc.id_typed(),
            changes: ClassificationChanges {
                company_id: Some(Some(company)),
                active: Some(false),
                ..ClassificationChanges::default()
            },
            occurred_at: Utc::now(),
        };
        let events = fc
            .handle(&ClassificationCommand::UpdateClassification(cmd))
            .unwrap();
        fc.apply(&events[0]);

        assert_eq!(fc.name(), "Food");
        assert_eq!(fc.company_id(), Some(company));
        assert!(!fc.is_active());
        assert_eq!(fc.sale_tax_ids(), &sale_before);
        assert_eq!(fc.version(), 2);
    }

    #[test]
    fn empty_update_emits_nothing() {
        let fc = created("Food");
        let cmd = UpdateClassification {
            classification_id: fc.id_typed(),
            changes: ClassificationChanges::default(),
            occurred_at: Utc::now(),
        };
        let events = fc
            .handle(&ClassificationCommand::UpdateClassification(cmd))
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn update_rejects_blank_rename() {
        let fc = created("Food");
        let cmd = UpdateClassification {
            classification_id: fc.id_typed(),
            changes: ClassificationChanges::rename(""),
            occurred_at: Utc::now(),
        };
        let err = fc
            .handle(&ClassificationCommand::UpdateClassification(cmd))
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn matches_requires_exact_sets() {
        let fc = created("Food");
        assert!(fc.matches(&fc.key()));

        let mut wider = fc.key();
        wider.purchase_tax_ids = [TaxId::new()].into_iter().collect();
        assert!(!fc.matches(&wider));
    }

    #[test]
    fn deserialized_records_count_as_created() {
        let fc = created("Food");
        let json = serde_json::to_string(&fc).unwrap();
        assert!(!json.contains("created"));

        let restored: FiscalClassification = serde_json::from_str(&json).unwrap();
        assert!(restored.is_created());
        assert_eq!(restored, fc);
    }
}
