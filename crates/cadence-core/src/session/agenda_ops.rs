//! Setup-phase operations: building the agenda before the meeting starts.

use log::info;

use super::{Event, MeetingSession};
use crate::{
    error::SessionError,
    models::{
        AgendaItem, AgendaTemplate, ItemId, Phase, TemplateItem, View, MAX_ESTIMATED_MINUTES,
    },
    params::{NewAgendaItem, SaveTemplate},
    Result,
};

impl MeetingSession {
    /// The running agenda is frozen once confirmed.
    fn require_setup(&self, action: &str) -> Result<()> {
        if self.phase != Phase::Setup {
            return Err(SessionError::invalid_transition(action, self.state_label()));
        }
        Ok(())
    }

    fn push_item(&mut self, title: String, minutes: u32, description: Option<String>) -> &AgendaItem {
        let id = self.unique_item_id();
        self.agenda_items
            .push(AgendaItem::new(id, title, minutes, description));
        let index = self.agenda_items.len() - 1;
        &self.agenda_items[index]
    }

    /// Ids carry a random tie-breaker; regenerate on the unlikely collision.
    fn unique_item_id(&self) -> ItemId {
        loop {
            let id = ItemId::generate(self.now());
            if !self.agenda_items.iter().any(|item| item.id == id) {
                return id;
            }
        }
    }

    pub(super) fn add_item(&mut self, params: &NewAgendaItem) -> Result<Vec<Event>> {
        self.require_setup("add an agenda item")?;
        let (title, minutes, description) = params.validate()?;
        let item = self.push_item(title, minutes, description).clone();
        Ok(vec![Event::ItemAdded {
            item,
            total_minutes: self.total_estimated_minutes(),
        }])
    }

    pub(super) fn remove_item(&mut self, id: &ItemId) -> Result<Vec<Event>> {
        self.require_setup("remove an agenda item")?;
        let position = self
            .agenda_items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| {
                SessionError::validation("id").with_reason(format!("No agenda item with id {id}"))
            })?;
        let removed = self.agenda_items.remove(position);
        Ok(vec![Event::ItemRemoved {
            title: removed.title,
            total_minutes: self.total_estimated_minutes(),
        }])
    }

    pub(super) fn load_template(&mut self, name: &str) -> Result<Vec<Event>> {
        self.require_setup("load a template")?;
        let template = self
            .settings
            .find_template(name)
            .cloned()
            .ok_or_else(|| {
                SessionError::validation("template")
                    .with_reason(format!("No template named '{}'", name.trim()))
            })?;

        self.agenda_items.clear();
        self.append_items(template.items);
        info!("Loaded template '{}'", template.name);
        Ok(vec![Event::AgendaLoaded {
            source: template.name,
            count: self.agenda_items.len(),
        }])
    }

    pub(super) fn import_items(&mut self, items: Vec<TemplateItem>) -> Result<Vec<Event>> {
        self.require_setup("import an agenda")?;
        let count = items.len();
        self.append_items(items);
        Ok(vec![Event::AgendaLoaded {
            source: "import".to_string(),
            count,
        }])
    }

    fn append_items(&mut self, items: Vec<TemplateItem>) {
        for item in items {
            // Stored templates bypass validation; keep their estimates in range.
            let minutes = item.estimated_minutes.clamp(1, MAX_ESTIMATED_MINUTES);
            self.push_item(item.title, minutes, item.description);
        }
    }

    pub(super) fn save_template(&mut self, params: &SaveTemplate) -> Result<Vec<Event>> {
        let template = AgendaTemplate {
            name: params.name.clone(),
            items: self.agenda_items.iter().map(TemplateItem::from).collect(),
        };
        self.settings.add_template(template)?;

        let name = params.name.trim().to_string();
        let mut events = vec![Event::TemplateSaved { name }];
        if let Err(e) = self.save_settings() {
            events.push(Self::storage_failed("saving templates", &e));
        }
        Ok(events)
    }

    pub(super) fn confirm_agenda(&mut self) -> Result<Vec<Event>> {
        self.require_setup("confirm the agenda")?;
        if self.agenda_items.is_empty() {
            return Err(SessionError::validation("agendaItems")
                .with_reason("Add at least one agenda item before starting"));
        }

        self.phase = Phase::Running;
        self.current_view = View::Timer;
        self.current_item_index = 0;
        self.completed_items.clear();
        info!(
            "Meeting {} started with {} items",
            self.meeting_id,
            self.agenda_items.len()
        );

        let mut events = vec![Event::AgendaConfirmed {
            total_items: self.agenda_items.len(),
        }];
        events.push(self.load_current_item());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::SessionError,
        models::{AgendaTemplate, Phase, TemplateItem, MAX_ESTIMATED_MINUTES},
        params::{NewAgendaItem, SaveTemplate},
        session::{Command, Event, MeetingSession, SessionBuilder},
        store::MemoryStore,
    };

    fn session() -> MeetingSession {
        SessionBuilder::new()
            .with_store(MemoryStore::new())
            .build()
            .unwrap()
    }

    fn add(session: &mut MeetingSession, title: &str, minutes: i64) -> crate::Result<Vec<Event>> {
        session.dispatch(Command::AddItem(NewAgendaItem::new(title, minutes)))
    }

    #[test]
    fn test_total_tracks_additions() {
        let mut session = session();
        add(&mut session, "Standup", 5).unwrap();
        add(&mut session, "Review", 10).unwrap();
        let events = add(&mut session, "Retro", 7).unwrap();
        assert_eq!(session.agenda_items().len(), 3);
        assert_eq!(session.total_estimated_minutes(), 22);
        assert!(matches!(
            &events[0],
            Event::ItemAdded { total_minutes: 22, .. }
        ));
    }

    #[test]
    fn test_invalid_items_rejected_without_change() {
        let mut session = session();
        assert!(add(&mut session, "   ", 5).is_err());
        assert!(add(&mut session, "Review", 0).is_err());
        assert!(add(&mut session, "Review", -4).is_err());
        assert!(session.agenda_items().is_empty());
    }

    #[test]
    fn test_huge_estimates_rejected_and_totals_exact() {
        let mut session = session();
        assert!(add(&mut session, "Offsite", 3_000_000_000).is_err());
        assert!(add(&mut session, "Offsite", 3_000_000_000).is_err());
        assert!(session.agenda_items().is_empty());

        add(&mut session, "Day one", 1440).unwrap();
        add(&mut session, "Day two", 1440).unwrap();
        assert_eq!(session.total_estimated_minutes(), 2880);
    }

    #[test]
    fn test_stored_template_estimates_are_clamped() {
        let mut session = session();
        session
            .settings_mut()
            .add_template(AgendaTemplate {
                name: "Marathon".to_string(),
                items: vec![TemplateItem::new("Forever", u32::MAX, "")],
            })
            .unwrap();
        session
            .dispatch(Command::LoadTemplate("Marathon".to_string()))
            .unwrap();
        assert_eq!(session.agenda_items()[0].estimated_minutes, MAX_ESTIMATED_MINUTES);
    }

    #[test]
    fn test_item_ids_are_unique() {
        let mut session = session();
        for _ in 0..20 {
            add(&mut session, "Same", 1).unwrap();
        }
        let mut ids: Vec<_> = session.agenda_items().iter().map(|i| i.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_remove_item() {
        let mut session = session();
        add(&mut session, "Standup", 5).unwrap();
        add(&mut session, "Review", 10).unwrap();
        let id = session.agenda_items()[0].id.clone();

        session.dispatch(Command::RemoveItem(id.clone())).unwrap();
        assert_eq!(session.agenda_items().len(), 1);
        assert_eq!(session.total_estimated_minutes(), 10);

        let err = session.dispatch(Command::RemoveItem(id)).unwrap_err();
        assert!(matches!(err, SessionError::Validation { .. }));
    }

    #[test]
    fn test_agenda_frozen_after_confirm() {
        let mut session = session();
        add(&mut session, "Standup", 5).unwrap();
        session.dispatch(Command::ConfirmAgenda).unwrap();

        let err = add(&mut session, "Late", 5).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
        assert_eq!(session.agenda_items().len(), 1);
    }

    #[test]
    fn test_confirm_requires_items() {
        let mut session = session();
        assert!(session.dispatch(Command::ConfirmAgenda).is_err());
        assert_eq!(session.phase(), Phase::Setup);
    }

    #[test]
    fn test_template_replaces_and_import_appends() {
        let mut session = session();
        add(&mut session, "Leftover", 3).unwrap();

        session
            .dispatch(Command::LoadTemplate("daily standup".to_string()))
            .unwrap();
        assert_eq!(session.agenda_items().len(), 3);
        assert_eq!(session.total_estimated_minutes(), 15);

        session
            .dispatch(Command::ImportAgenda(vec![TemplateItem::new("Extra", 4, "")]))
            .unwrap();
        assert_eq!(session.agenda_items().len(), 4);
        assert_eq!(session.agenda_items()[3].title, "Extra");

        assert!(session
            .dispatch(Command::LoadTemplate("missing".to_string()))
            .is_err());
    }

    #[test]
    fn test_save_template_persists() {
        let store = MemoryStore::new();
        let mut session = SessionBuilder::new()
            .with_store(store.clone())
            .build()
            .unwrap();
        add(&mut session, "Demo", 20).unwrap();
        session
            .dispatch(Command::SaveTemplate(SaveTemplate {
                name: "Sprint Demo".to_string(),
            }))
            .unwrap();

        let reloaded = SessionBuilder::new().with_store(store).build().unwrap();
        let template = reloaded.settings().find_template("sprint demo").unwrap();
        assert_eq!(template.total_minutes(), 20);
    }
}
