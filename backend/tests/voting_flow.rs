//! End-to-end voting behaviour over the full application and the in-memory
//! store: eligibility, the one-vote rule, results and masked listings.

#[path = "support/app.rs"]
mod app;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

use app::{
    ADMIN_EMAIL, Backend, Window, create_community, create_project, create_session, join, login,
    send, sign_up, vote_request,
};

#[rstest]
#[actix_rt::test]
async fn concurrent_duplicate_votes_admit_exactly_one() {
    let backend = Backend::new().with_admin().await;
    let app = backend.start().await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let session_id = create_session(&app, &admin, None, Window::LIVE).await;
    let first = create_project(&app, &admin, &session_id, "Praça nova").await;
    let second = create_project(&app, &admin, &session_id, "Ciclovia").await;
    sign_up(&app, None, "bia@example.com", "PARTICIPANTE", None).await;
    let voter = login(&app, "bia@example.com").await;

    let (a, b) = futures::join!(
        send(&app, vote_request(&session_id, &first), Some(&voter)),
        send(&app, vote_request(&session_id, &second), Some(&voter)),
    );

    let mut statuses = [a.status, b.status];
    statuses.sort_by_key(StatusCode::as_u16);
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
    let loser = if a.status == StatusCode::CONFLICT { a } else { b };
    assert_eq!(loser.body["error"], "already voted");
}

#[rstest]
#[case::not_started(Window { starts_in: 1, ends_in: 3, active: true })]
#[case::ended(Window { starts_in: -3, ends_in: -1, active: true })]
#[case::inactive(Window { starts_in: -1, ends_in: 2, active: false })]
#[actix_rt::test]
async fn votes_outside_a_live_window_are_rejected(#[case] window: Window) {
    let backend = Backend::new().with_admin().await;
    let app = backend.start().await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let session_id = create_session(&app, &admin, None, window).await;
    let project_id = create_project(&app, &admin, &session_id, "Praça nova").await;
    sign_up(&app, None, "bia@example.com", "PARTICIPANTE", None).await;
    let voter = login(&app, "bia@example.com").await;

    let reply = send(&app, vote_request(&session_id, &project_id), Some(&voter)).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "session not active");
}

#[rstest]
#[actix_rt::test]
async fn joining_the_community_unlocks_voting() {
    let backend = Backend::new().with_admin().await;
    let app = backend.start().await;
    let admin = login(&app, ADMIN_EMAIL).await;
    sign_up(&app, Some(&admin), "gil@example.com", "GESTOR", None).await;
    let manager = login(&app, "gil@example.com").await;
    let (community_id, code) = create_community(&app, &manager, "Bairro Alto").await;
    let session_id = create_session(&app, &manager, Some(&community_id), Window::LIVE).await;
    let project_id = create_project(&app, &manager, &session_id, "Horta").await;
    sign_up(&app, None, "bia@example.com", "PARTICIPANTE", None).await;
    let voter = login(&app, "bia@example.com").await;

    let outsider = send(&app, vote_request(&session_id, &project_id), Some(&voter)).await;
    assert_eq!(outsider.status, StatusCode::FORBIDDEN);
    assert_eq!(outsider.body["error"], "not a member");

    let joined = join(&app, &voter, &code).await;
    assert_eq!(joined.status, StatusCode::OK, "{}", joined.body);
    assert_eq!(
        joined.body["message"],
        "Você ingressou na comunidade \"Bairro Alto\" com sucesso"
    );

    let member = send(&app, vote_request(&session_id, &project_id), Some(&voter)).await;
    assert_eq!(member.status, StatusCode::CREATED, "{}", member.body);
    assert_eq!(member.body["message"], "Voto registrado com sucesso");
    assert_eq!(member.data()["projeto_titulo"], "Horta");

    let again = join(&app, &voter, &code).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[rstest]
#[actix_rt::test]
async fn results_report_percentages_most_voted_first() {
    let backend = Backend::new().with_admin().await;
    let app = backend.start().await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let session_id = create_session(&app, &admin, None, Window::LIVE).await;
    let minor = create_project(&app, &admin, &session_id, "Ciclovia").await;
    let major = create_project(&app, &admin, &session_id, "Praça nova").await;

    for (index, project) in [&major, &major, &major, &minor].into_iter().enumerate() {
        let email = format!("p{index}@example.com");
        sign_up(&app, None, &email, "PARTICIPANTE", None).await;
        let voter = login(&app, &email).await;
        let reply = send(&app, vote_request(&session_id, project), Some(&voter)).await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    }

    let results = send(
        &app,
        TestRequest::get().uri(&format!("/api/votos/resultados?sessao_id={session_id}")),
        Some(&admin),
    )
    .await;

    assert_eq!(results.status, StatusCode::OK, "{}", results.body);
    let data = results.data();
    assert_eq!(data["total_votos"], 4);
    assert_eq!(data["resultados"][0]["projeto_id"], major.as_str());
    assert_eq!(data["resultados"][0]["percentual"], 75.0);
    assert_eq!(data["resultados"][1]["projeto_id"], minor.as_str());
    assert_eq!(data["resultados"][1]["percentual"], 25.0);
}

#[rstest]
#[actix_rt::test]
async fn results_without_votes_list_every_project_at_zero() {
    let backend = Backend::new().with_admin().await;
    let app = backend.start().await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let session_id = create_session(&app, &admin, None, Window::LIVE).await;
    create_project(&app, &admin, &session_id, "Ciclovia").await;
    let described = send(
        &app,
        TestRequest::post().uri("/api/projetos").set_json(json!({
            "sessao_id": session_id,
            "titulo": "Praça nova",
            "descricao": "Bancos e sombra",
            "autor": "Associação do bairro",
        })),
        Some(&admin),
    )
    .await;
    assert_eq!(described.status, StatusCode::CREATED, "{}", described.body);
    assert_eq!(described.data()["autor"], "Associação do bairro");

    let results = send(
        &app,
        TestRequest::get().uri(&format!("/api/votos/resultados?sessao_id={session_id}")),
        Some(&admin),
    )
    .await;

    let rows = results.data()["resultados"].as_array().expect("rows");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["percentual"] == 0.0 && row["votos"] == 0));
    assert_eq!(rows[1]["descricao"], "Bancos e sombra");
    assert_eq!(rows[1]["autor"], "Associação do bairro");
    assert!(rows[0]["autor"].is_null());
}

#[rstest]
#[actix_rt::test]
async fn participants_see_results_only_after_voting() {
    let backend = Backend::new().with_admin().await;
    let app = backend.start().await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let (community_id, code) = create_community(&app, &admin, "Sede").await;
    let session_id = create_session(&app, &admin, Some(&community_id), Window::LIVE).await;
    let project_id = create_project(&app, &admin, &session_id, "Ciclovia").await;
    sign_up(&app, None, "bia@example.com", "PARTICIPANTE", None).await;
    let voter = login(&app, "bia@example.com").await;
    join(&app, &voter, &code).await;
    let uri = format!("/api/votos/resultados?sessao_id={session_id}");

    let before = send(&app, TestRequest::get().uri(&uri), Some(&voter)).await;
    assert_eq!(before.status, StatusCode::FORBIDDEN);

    send(&app, vote_request(&session_id, &project_id), Some(&voter)).await;
    let after = send(&app, TestRequest::get().uri(&uri), Some(&voter)).await;
    assert_eq!(after.status, StatusCode::OK);

    let missing = send(&app, TestRequest::get().uri("/api/votos/resultados"), Some(&voter)).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_rt::test]
async fn listings_and_reports_mask_the_cpf() {
    let backend = Backend::new().with_admin().await;
    let app = backend.start().await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let session_id = create_session(&app, &admin, None, Window::LIVE).await;
    let project_id = create_project(&app, &admin, &session_id, "Ciclovia").await;
    sign_up(&app, None, "bia@example.com", "PARTICIPANTE", Some("12345678901")).await;
    let voter = login(&app, "bia@example.com").await;
    send(
        &app,
        TestRequest::post().uri("/api/votos").set_json(json!({
            "sessao_id": session_id,
            "projeto_id": project_id,
            "comentario": "  Apoio  ",
        })),
        Some(&voter),
    )
    .await;

    let listed = send(
        &app,
        TestRequest::get().uri(&format!("/api/votos?sessao_id={session_id}")),
        Some(&admin),
    )
    .await;
    assert_eq!(listed.data()[0]["usuario_cpf"], "123.456.789-**");
    assert_eq!(listed.data()[0]["comentario"], "Apoio");

    let report = send(
        &app,
        TestRequest::get().uri(&format!("/api/relatorios/votos?sessao_id={session_id}")),
        Some(&admin),
    )
    .await;
    assert_eq!(report.status, StatusCode::OK, "{}", report.body);
    let vote = &report.data()[0]["projetos"][0]["votos"][0];
    assert_eq!(vote["cpf"], "123.456.789-**");
    assert_eq!(vote["participante"], "bia");

    let forbidden = send(
        &app,
        TestRequest::get().uri("/api/relatorios/votos"),
        Some(&voter),
    )
    .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_rt::test]
async fn voters_can_change_and_retract_their_ballot_while_live() {
    let backend = Backend::new().with_admin().await;
    let app = backend.start().await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let session_id = create_session(&app, &admin, None, Window::LIVE).await;
    let first = create_project(&app, &admin, &session_id, "Ciclovia").await;
    let second = create_project(&app, &admin, &session_id, "Praça nova").await;
    sign_up(&app, None, "bia@example.com", "PARTICIPANTE", None).await;
    let voter = login(&app, "bia@example.com").await;
    let cast = send(&app, vote_request(&session_id, &first), Some(&voter)).await;
    let vote_id = cast.id();

    let moved = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/votos/{vote_id}"))
            .set_json(json!({ "projeto_id": second })),
        Some(&voter),
    )
    .await;
    assert_eq!(moved.status, StatusCode::OK, "{}", moved.body);
    assert_eq!(moved.data()["projeto_id"], second.as_str());

    let retracted = send(
        &app,
        TestRequest::delete().uri(&format!("/api/votos/{vote_id}")),
        Some(&voter),
    )
    .await;
    assert_eq!(retracted.status, StatusCode::OK);
    assert_eq!(retracted.body["message"], "Voto excluído com sucesso");

    let recast = send(&app, vote_request(&session_id, &first), Some(&voter)).await;
    assert_eq!(recast.status, StatusCode::CREATED);
}
