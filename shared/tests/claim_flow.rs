use crux_core::testing::AppTester;
use shared::capabilities::{SubmissionError, SubmissionOperation, SubmissionReceipt};
use shared::claim::ClaimCommand;
use shared::{App, Effect, Event, Model, NavCommand, Screen, ToastKind};

fn on_map(app: &AppTester<App, Effect>) -> Model {
    let mut model = Model::default();
    app.update(Event::Navigate(NavCommand::CompleteAuth), &mut model);
    app.update(Event::Navigate(NavCommand::Navigate(Screen::Map)), &mut model);
    assert_eq!(model.session.active_screen, Screen::Map);
    model
}

fn open_form(app: &AppTester<App, Effect>, model: &mut Model) {
    app.update(
        Event::OpenClaimForm {
            issue_name: "Overflowing bins".into(),
            issue_location: "Riverside Park".into(),
        },
        model,
    );
}

fn fill(app: &AppTester<App, Effect>, model: &mut Model) {
    app.update(Event::Claim(ClaimCommand::SetDate("2026-11-02".into())), model);
    app.update(Event::Claim(ClaimCommand::SetTime("09:00".into())), model);
}

fn confirm(
    app: &AppTester<App, Effect>,
    model: &mut Model,
) -> Option<crux_core::Request<SubmissionOperation>> {
    let update = app.update(Event::Claim(ClaimCommand::Confirm), model);
    update.effects.into_iter().find_map(|effect| match effect {
        Effect::Submission(request) => Some(request),
        _ => None,
    })
}

#[test]
fn claim_form_requires_date_and_time() {
    let app = AppTester::<App, Effect>::default();
    let mut model = on_map(&app);
    open_form(&app, &mut model);

    let view = app.view(&model).claim.expect("claim view");
    assert_eq!(view.meeting_point, "Riverside Park");
    assert!(!view.can_confirm);
    assert!(confirm(&app, &mut model).is_none());

    fill(&app, &mut model);
    assert!(app.view(&model).claim.expect("claim view").can_confirm);
}

#[test]
fn confirmed_claim_closes_form() {
    let app = AppTester::<App, Effect>::default();
    let mut model = on_map(&app);
    open_form(&app, &mut model);
    fill(&app, &mut model);

    let mut request = confirm(&app, &mut model).expect("claim request");
    let SubmissionOperation::ClaimEvent(payload) = request.operation.clone() else {
        panic!("expected a claim submission");
    };
    assert_eq!(payload.date, "2026-11-02");
    assert!(app.view(&model).claim.expect("claim view").confirming);

    let update = app
        .resolve(
            &mut request,
            Ok(SubmissionReceipt {
                client_ref: payload.client_ref,
                server_id: Some("event-12".into()),
            }),
        )
        .expect("claim resolves");
    for event in update.events {
        app.update(event, &mut model);
    }

    assert!(model.claim.is_none());
    assert_eq!(model.toast.as_ref().map(|t| t.kind), Some(ToastKind::Success));

    // Joining the cleanup opens the event chat.
    app.update(Event::Navigate(NavCommand::JoinCleanup), &mut model);
    assert_eq!(model.session.active_screen, Screen::ChatRoom);
}

#[test]
fn failed_claim_keeps_form() {
    let app = AppTester::<App, Effect>::default();
    let mut model = on_map(&app);
    open_form(&app, &mut model);
    fill(&app, &mut model);

    let mut request = confirm(&app, &mut model).expect("claim request");
    let update = app
        .resolve(
            &mut request,
            Err(SubmissionError::AlreadyClaimed {
                holder: "Green Warriors".into(),
            }),
        )
        .expect("claim resolves");
    for event in update.events {
        app.update(event, &mut model);
    }

    let view = app.view(&model);
    let claim = view.claim.expect("claim view");
    assert!(!claim.confirming);
    assert_eq!(claim.time, "09:00");
    assert_eq!(view.toast.map(|t| t.kind), Some(ToastKind::Error));
}

#[test]
fn claim_form_is_map_only() {
    let app = AppTester::<App, Effect>::default();
    let mut model = on_map(&app);
    open_form(&app, &mut model);
    assert!(model.claim.is_some());

    app.update(Event::Navigate(NavCommand::Navigate(Screen::Home)), &mut model);
    assert!(model.claim.is_none());

    open_form(&app, &mut model);
    assert!(model.claim.is_none());
}
