use booking_core::{
    BookingSession, Catalog, ContactDetails, FormState, ItemsSummary, RowRemoval, compute_total,
    format_total,
};

#[derive(Debug, Clone, Copy)]
enum Action {
    Add,
    RemoveFirst,
    RemoveLast,
    Select(usize, &'static str),
    Quantity(usize, &'static str),
}

const ALPHABET: [Action; 7] = [
    Action::Add,
    Action::RemoveFirst,
    Action::RemoveLast,
    Action::Select(0, "small-bag"),
    Action::Select(1, "fridge"),
    Action::Quantity(0, "3"),
    Action::Quantity(1, "oops"),
];

fn apply(form: &mut FormState, action: Action) {
    match action {
        Action::Add => {
            form.add_row();
        }
        Action::RemoveFirst => {
            let id = form.rows()[0].id;
            let outcome = form.remove_row(id);
            assert_ne!(outcome, RowRemoval::Unknown);
        }
        Action::RemoveLast => {
            let id = form.rows()[form.row_count() - 1].id;
            form.remove_row(id);
        }
        Action::Select(index, value) => {
            if let Some(id) = form.rows().get(index).map(|row| row.id) {
                form.set_item(id, Some(value));
            }
        }
        Action::Quantity(index, raw) => {
            if let Some(id) = form.rows().get(index).map(|row| row.id) {
                let quantity = booking_core::parse_quantity(raw);
                form.set_quantity(id, quantity);
            }
        }
    }
}

fn expected_total(form: &FormState, catalog: &Catalog) -> i64 {
    form.rows()
        .iter()
        .map(|row| {
            let price = row
                .item
                .as_deref()
                .and_then(|v| catalog.find(v))
                .map_or(0, |item| item.price_cents);
            price * i64::from(row.quantity)
        })
        .sum()
}

#[test]
fn every_short_action_sequence_keeps_row_and_total_invariants() {
    let catalog = Catalog::load_default().expect("catalog");
    let n = ALPHABET.len();
    // All sequences of length 4 over the alphabet.
    for code in 0..n.pow(4) {
        let mut form = FormState::new();
        let mut rest = code;
        for _ in 0..4 {
            apply(&mut form, ALPHABET[rest % n]);
            rest /= n;

            assert!(form.row_count() >= 1, "sequence {code} emptied the form");
            assert_eq!(form.remove_visible(), form.row_count() > 1);
            let total = form.total_view(&catalog);
            assert_eq!(total.total_cents, expected_total(&form, &catalog));
            assert_eq!(total.submit_enabled, total.total_cents > 0);
        }
    }
}

#[test]
fn worked_example_totals_140() {
    let catalog = Catalog::load_default().expect("catalog");
    let mut form = FormState::new();
    let first = form.rows()[0].id;
    form.apply_inputs(first, "40", "2");
    let second = form.add_row();
    form.apply_inputs(second, "60", "1");
    let total = compute_total(form.rows(), &catalog);
    assert_eq!(format_total(total), "140.00");
}

#[test]
fn summary_placeholder_when_nothing_qualifies() {
    let catalog = Catalog::load_default().expect("catalog");
    let mut form = FormState::new();
    let first = form.rows()[0].id;
    form.apply_inputs(first, "", "5");
    let second = form.add_row();
    form.apply_inputs(second, "fridge", "");
    let summary = ItemsSummary::from_rows(form.rows(), &catalog);
    assert_eq!(summary.to_text(), "No items selected");
}

#[test]
fn session_reset_after_success_matches_fresh_form_rows() {
    let catalog = Catalog::load_default().expect("catalog");
    let mut session = BookingSession::new();
    let first = session.form().rows()[0].id;
    session.form_mut().apply_inputs(first, "medium-bag", "2");
    session.form_mut().add_row();
    session
        .begin(ContactDetails::default(), &catalog)
        .expect("submit");
    session.finish(&Ok(()));
    assert_eq!(session.form().rows(), FormState::new().rows());
}
