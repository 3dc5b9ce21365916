use crate::helpers::{
    journal, named, next_event, record, CustomEventAdd, EmptyFilter, PanickingFilter, SeedingPipe,
};
use sluice::{Passthrough, Pipe, PipeConfig, PipeError, Stage};
use std::sync::Arc;
use tokio_test::assert_ok;

fn passthrough(name: &str) -> Pipe<Passthrough<String>> {
    Pipe::new(Passthrough::new(), named(name))
}

#[cfg(test)]
mod chain_tests {
    use super::*;

    #[tokio::test]
    async fn it_should_forward_add_once_after_the_upstream_add_event() {
        // Given
        let users = passthrough("users");
        let view = passthrough("view");
        let events = journal();
        record(&events, &users, "users", &["adding", "add"]);
        record(&events, &view, "view", &["adding", "add"]);
        let shown = view.events().stream("add");
        users.pipe(view.clone());

        // When
        assert_ok!(users.add("ada".to_string()).await);
        assert_eq!(next_event(&shown).await, "ada");

        // Then
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "users:adding:ada",
                "users:add:ada",
                "view:adding:ada",
                "view:add:ada",
            ]
        );
        assert!(shown.try_recv().is_err());
    }

    #[tokio::test]
    async fn it_should_forward_remove_to_the_downstream() {
        // Given
        let users = passthrough("users");
        let view = passthrough("view");
        let removed = view.events().stream("remove");
        users.pipe(view.clone());

        // When
        assert_ok!(users.remove("ada".to_string()).await);

        // Then
        assert_eq!(next_event(&removed).await, "ada");
    }

    #[tokio::test]
    async fn it_should_chain_through_each_explicit_pipe() {
        // Given
        let a = passthrough("a");
        let b = passthrough("b");
        let c = passthrough("c");
        let events = journal();
        record(&events, &b, "b", &["adding"]);
        record(&events, &c, "c", &["adding"]);
        let reached = c.events().stream("add");

        // When
        let returned = a.pipe(b.clone()).pipe(c.clone());
        assert_ok!(a.add("ada".to_string()).await);
        assert_eq!(next_event(&reached).await, "ada");

        // Then
        assert_eq!(returned.name(), "c");
        assert_eq!(a.events().handler_count("add"), 1);
        assert_eq!(b.events().handler_count("add"), 1);
        assert_eq!(
            *events.lock().unwrap(),
            vec!["b:adding:ada", "c:adding:ada"]
        );
    }

    #[tokio::test]
    async fn it_should_not_forward_custom_completion_events() {
        // Given
        let users = Pipe::new(CustomEventAdd("update"), named("users"));
        let view = passthrough("view");
        let reached = view.events().stream("adding");
        users.pipe(view.clone());

        // When
        let settled = assert_ok!(users.add("ada".to_string()).await);

        // Then
        assert_eq!(settled.event(), Some("update"));
        assert!(reached.try_recv().is_err());
    }

    #[tokio::test]
    async fn it_should_run_the_pipe_hook_with_the_downstream() {
        // Given
        let seeded = Pipe::new(SeedingPipe::new("root"), named("seeded"));
        let view = passthrough("view");
        let shown = view.events().stream("add");

        // When
        seeded.pipe(view.clone());

        // Then
        assert_eq!(
            *seeded.behavior().attached.lock().unwrap(),
            vec!["Pipe(view)"]
        );
        assert_eq!(next_event(&shown).await, "root");
    }

    #[tokio::test]
    async fn it_should_keep_downstream_failures_off_the_upstream_handle() {
        // Given
        let users = passthrough("users");
        let broken = Pipe::new(EmptyFilter, named("broken"));
        let errors = broken.error_stream();
        users.pipe(broken.clone());

        // When
        let settled = assert_ok!(users.add("ada".to_string()).await);

        // Then
        assert_eq!(settled.event(), Some("add"));
        assert_eq!(next_event(&errors).await.stage(), Some(Stage::Filter));
    }

    #[tokio::test]
    async fn it_should_report_panicking_downstreams_on_their_error_channel() {
        // Given
        let users = passthrough("users");
        let broken = Pipe::new(PanickingFilter, named("broken"));
        let upstream_errors = users.error_stream();
        let errors = broken.error_stream();
        users.pipe(broken.clone());

        // When
        assert_ok!(users.add("ada".to_string()).await);

        // Then
        let error = next_event(&errors).await;
        assert!(matches!(&error, PipeError::Aborted(message) if message.contains("filter exploded")));
        assert!(upstream_errors.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn it_should_chain_three_pipes_on_a_multi_threaded_runtime() {
        // Given
        let a = passthrough("a");
        let b = passthrough("b");
        let c = passthrough("c");
        let shown = c.events().stream("add");
        a.pipe(b.clone()).pipe(c.clone());
        let mut expected: Vec<String> = (0..10).map(|i| format!("item-{i}")).collect();

        // When
        for item in &expected {
            assert_ok!(a.add(item.clone()).await);
        }
        let mut received = Vec::new();
        for _ in 0..expected.len() {
            received.push(next_event(&shown).await);
        }

        // Then
        received.sort();
        expected.sort();
        assert_eq!(received, expected);
        assert!(shown.try_recv().is_err());
    }

    #[tokio::test]
    async fn it_should_forward_to_shared_downstreams() {
        // Given
        let users = passthrough("users");
        let view = Arc::new(passthrough("view"));
        let shown = view.events().stream("add");
        users.pipe(Arc::clone(&view));

        // When
        assert_ok!(users.add("ada".to_string()).await);

        // Then
        assert_eq!(next_event(&shown).await, "ada");
    }

    #[tokio::test]
    async fn it_should_log_the_chain() {
        // Given
        let logger = Arc::new(crate::helpers::RecordingLogger::default());
        let users = Pipe::new(
            Passthrough::<String>::new(),
            PipeConfig::default()
                .with_name("users")
                .with_logger(logger.clone()),
        );

        // When
        users.pipe(passthrough("view"));

        // Then
        assert_eq!(logger.messages(), vec!["piped Pipe(users) to Pipe(view)"]);
    }
}
