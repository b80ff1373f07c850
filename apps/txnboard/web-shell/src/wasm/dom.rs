use super::*;

pub(super) fn current_document() -> Result<Document, SyncError> {
    let window = web_sys::window().ok_or_else(|| SyncError::missing_element("window"))?;
    window
        .document()
        .ok_or_else(|| SyncError::missing_element("document"))
}

/// Live view over the server-rendered transaction table.
pub(super) struct WebTable {
    document: Document,
    selectors: DomSelectors,
}

impl WebTable {
    pub(super) fn new(document: Document, selectors: DomSelectors) -> Self {
        Self {
            document,
            selectors,
        }
    }

    fn query_all(&self, root: &Element, selector: &str) -> Vec<Element> {
        let Ok(nodes) = root.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    /// Compares attribute values directly so ids never end up inside a selector.
    fn row(&self, id: &TransactionId) -> Result<Element, SyncError> {
        let attribute = &self.selectors.row_id_attribute;
        let Some(root) = self.document.document_element() else {
            return Err(SyncError::missing_element("document element"));
        };
        self.query_all(&root, &format!("{ROW_TAG}[{attribute}]"))
            .into_iter()
            .find(|row| row.get_attribute(attribute).as_deref() == Some(id.as_str()))
            .ok_or_else(|| SyncError::MissingRow { id: id.clone() })
    }

    fn phone_input(&self, id: &TransactionId) -> Result<HtmlInputElement, SyncError> {
        let row = self.row(id)?;
        row.query_selector(&self.selectors.phone_input)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .ok_or_else(|| SyncError::missing_element(format!("phone input of row {id}")))
    }

    fn badge(&self, id: &TransactionId) -> Result<Element, SyncError> {
        let row = self.row(id)?;
        row.query_selector(&self.selectors.badge)
            .ok()
            .flatten()
            .ok_or_else(|| SyncError::missing_element(format!("badge of row {id}")))
    }

    fn body_rows(&self) -> Vec<HtmlElement> {
        let Some(root) = self.document.document_element() else {
            return Vec::new();
        };
        self.query_all(&root, &self.selectors.table_rows)
            .into_iter()
            .filter_map(|row| row.dyn_into::<HtmlElement>().ok())
            .collect()
    }
}

impl TableView for WebTable {
    fn badge_action(&self, id: &TransactionId) -> Result<CallAction, SyncError> {
        let badge = self.badge(id)?;
        let label = badge
            .get_attribute(&self.selectors.badge_action_attribute)
            .unwrap_or_default();
        Ok(CallAction::parse(&label))
    }

    fn phone_has_focus(&self, id: &TransactionId) -> Result<bool, SyncError> {
        let input = self.phone_input(id)?;
        let input_node: &web_sys::Node = input.as_ref();
        Ok(self
            .document
            .active_element()
            .is_some_and(|active| active.is_same_node(Some(input_node))))
    }

    fn set_phone_value(&self, id: &TransactionId, value: &str) -> Result<(), SyncError> {
        self.phone_input(id)?.set_value(value);
        Ok(())
    }

    fn set_badge_action(&self, id: &TransactionId, action: &CallAction) -> Result<(), SyncError> {
        let badge = self.badge(id)?;
        badge.set_text_content(Some(action.label()));
        badge
            .set_attribute(&self.selectors.badge_action_attribute, action.label())
            .map_err(|_| SyncError::missing_element(format!("action attribute of row {id}")))
    }

    fn row_texts(&self) -> Vec<String> {
        self.body_rows().iter().map(|row| row.inner_text()).collect()
    }

    fn apply_visibility(&self, visibility: &[bool]) -> Result<(), SyncError> {
        let rows = self.body_rows();
        let mut first_error = None;
        for (index, (row, visible)) in rows.iter().zip(visibility).enumerate() {
            let display = if *visible { "" } else { "none" };
            if row.style().set_property("display", display).is_err() && first_error.is_none() {
                first_error = Some(SyncError::missing_element(format!(
                    "style of table row #{index}"
                )));
            }
        }
        if rows.len() != visibility.len() && first_error.is_none() {
            first_error = Some(SyncError::missing_element(format!(
                "{} table rows for {} search results",
                rows.len(),
                visibility.len()
            )));
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn enclosing_row_id(element: &Element, attribute: &str) -> Option<TransactionId> {
    let row = element.closest(ROW_TAG).ok().flatten()?;
    row.get_attribute(attribute).map(TransactionId::from)
}

fn event_element(event: &web_sys::Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

pub(super) fn attach(
    board: &Rc<BoardSync>,
    document: &Document,
    selectors: &DomSelectors,
) -> Result<(), SyncError> {
    let root = document
        .document_element()
        .ok_or_else(|| SyncError::missing_element("document element"))?;

    let phone_inputs = board.view().query_all(&root, &selectors.phone_input);
    PHONE_CHANGE_HANDLERS.with(|slot| {
        let mut handlers = slot.borrow_mut();
        if !handlers.is_empty() {
            return;
        }
        for input in &phone_inputs {
            let board = Rc::clone(board);
            let attribute = selectors.row_id_attribute.clone();
            let callback =
                Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event: web_sys::Event| {
                    let Some(input) = event_element(&event)
                        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
                    else {
                        return;
                    };
                    let Some(id) = enclosing_row_id(&input, &attribute) else {
                        return;
                    };
                    let value = input.value();
                    let board = Rc::clone(&board);
                    spawn_local(async move {
                        let _ = board.on_phone_change(&id, &value).await;
                    });
                }));
            let _ = input.add_event_listener_with_callback(
                PHONE_COMMIT_EVENT,
                callback.as_ref().unchecked_ref(),
            );
            handlers.push(callback);
        }
    });

    let badges = board.view().query_all(&root, &selectors.clickable_badge);
    BADGE_CLICK_HANDLERS.with(|slot| {
        let mut handlers = slot.borrow_mut();
        if !handlers.is_empty() {
            return;
        }
        for badge in &badges {
            let board = Rc::clone(board);
            let attribute = selectors.row_id_attribute.clone();
            let callback =
                Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event: web_sys::Event| {
                    let Some(id) = event_element(&event)
                        .and_then(|element| enclosing_row_id(&element, &attribute))
                    else {
                        return;
                    };
                    let board = Rc::clone(&board);
                    spawn_local(async move {
                        let _ = board.on_badge_click(&id).await;
                    });
                }));
            let _ = badge.add_event_listener_with_callback(
                BADGE_CLICK_EVENT,
                callback.as_ref().unchecked_ref(),
            );
            handlers.push(callback);
        }
    });

    let search = document
        .get_element_by_id(&selectors.search_input_id)
        .ok_or_else(|| {
            SyncError::missing_element(format!("search input #{}", selectors.search_input_id))
        })?;
    SEARCH_INPUT_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let board = Rc::clone(board);
        let callback =
            Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event: web_sys::Event| {
                let Some(input) = event_element(&event)
                    .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                board.on_search_input(&input.value());
            }));
        let _ = search.add_event_listener_with_callback(
            SEARCH_INPUT_EVENT,
            callback.as_ref().unchecked_ref(),
        );
        *slot.borrow_mut() = Some(callback);
    });

    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.phone_inputs_bound = phone_inputs.len();
        state.badges_bound = badges.len();
    });
    Ok(())
}
