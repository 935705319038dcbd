//! End-to-end tests: a LeadForm filled in step by step and submitted over
//! HTTP to a mocked endpoint.

use std::sync::{Arc, Mutex};

use lead_form::{
    Category, Field, FormConfig, LeadForm, Navigator, Stage, StepOutcome, SubmissionResult,
    SubmitError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Navigator that remembers every destination it was sent to
#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &str) {
        self.visits.lock().unwrap().push(destination.to_string());
    }
}

fn form_for(server: &MockServer) -> (LeadForm, Arc<RecordingNavigator>) {
    let config = FormConfig {
        timeout_secs: Some(5),
        ..Default::default()
    }
    .with_base_url_override(Some(server.uri()));
    let navigator = Arc::new(RecordingNavigator::default());
    let form = LeadForm::from_config(&config, navigator.clone()).unwrap();
    (form, navigator)
}

fn step(form: &mut LeadForm, answers: &[(Field, &str)]) -> StepOutcome {
    for (field, value) in answers {
        assert!(form.edit_field(*field, *value), "edit of {field} refused");
    }
    form.advance().unwrap()
}

/// Fill a retiree lead up to the final sub-step, leaving it on screen
fn retiree_ready(form: &mut LeadForm) {
    step(
        form,
        &[
            (Field::FullName, "Anna Verdi"),
            (Field::Email, "anna@example.com"),
            (Field::Phone, "333 987 6543"),
        ],
    );
    assert!(form.choose_category(Category::Retiree));
    assert_eq!(form.total_steps(), 7);

    step(form, &[(Field::PensionProvider, "ex-inpdap")]);
    step(form, &[(Field::PensionKind, "anticipata")]);
    step(form, &[(Field::NetIncome, "1.450")]);
    step(form, &[(Field::BirthYear, "1955")]);
    step(form, &[(Field::ExistingLoans, "si")]);
    let outcome = step(
        form,
        &[
            (Field::City, "Torino"),
            (Field::Province, "TO"),
            (Field::Note, "Vorrei essere richiamata di mattina"),
        ],
    );
    assert_eq!(outcome, StepOutcome::ReadyToSubmit);
    assert_eq!(form.current_step(), 7);
    assert_eq!(form.progress_percent(), 100);
}

#[tokio::test]
async fn accepted_lead_navigates_to_confirmation_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/forms/immobiliare"))
        .and(body_partial_json(json!({
            "nomeCognome": "Anna Verdi",
            "telefono": "333 987 6543",
            "categoria": "PENSIONATO",
            "domande": "Vorrei essere richiamata di mattina",
            "dettagli": {
                "entePensionistico": "ex-inpdap",
                "tipoPensione": "anticipata",
                "finanziamentiInCorso": "si"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut form, navigator) = form_for(&server);
    retiree_ready(&mut form);

    assert_eq!(form.submit().await, Ok(SubmissionResult::Success));
    assert_eq!(form.stage(), Stage::Submitted);
    assert_eq!(form.submit().await, Err(SubmitError::AlreadySubmitted));
    assert_eq!(navigator.visits(), vec!["/grazie".to_string()]);
}

#[tokio::test]
async fn rejected_lead_keeps_answers_for_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/forms/immobiliare"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "error": "Telefono non valido" })),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/forms/immobiliare"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (mut form, navigator) = form_for(&server);
    retiree_ready(&mut form);

    let first = form.submit().await.unwrap();
    assert_eq!(first.error_message(), Some("Telefono non valido"));
    assert_eq!(form.stage(), Stage::SubmissionFailed);
    assert!(form.is_at_final_step());
    assert_eq!(form.draft().value(Field::City), Some("Torino"));
    assert!(navigator.visits().is_empty());

    form.dismiss_error();
    assert_eq!(form.submit().await, Ok(SubmissionResult::Success));
    assert_eq!(navigator.visits().len(), 1);
}

#[tokio::test]
async fn incomplete_form_never_reaches_the_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (mut form, navigator) = form_for(&server);
    step(
        &mut form,
        &[
            (Field::FullName, "Anna Verdi"),
            (Field::Email, "anna@example.com"),
            (Field::Phone, "3339876543"),
        ],
    );
    assert_eq!(form.submit().await, Err(SubmitError::NotAtFinalStep));

    assert!(form.choose_category(Category::Employee));
    assert_eq!(form.total_steps(), 10);
    assert_eq!(form.submit().await, Err(SubmitError::NotAtFinalStep));
    assert!(navigator.visits().is_empty());
}
