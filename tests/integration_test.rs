use math_router::error::RemoteError;
use math_router::infrastructure::{RemoteRequest, StaticProbe};
use math_router::{
    classify, App, Config, EvaluatorKind, ProblemComplexity, ProblemKind, RemoteClient,
    SolveDispatcher, SolverConfig, SolverMode,
};
use std::future::Future;
use std::path::PathBuf;

/// 模拟不可用的远程端点
struct DownRemote;

impl RemoteClient for DownRemote {
    fn solve(
        &self,
        request: RemoteRequest,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send {
        async move {
            Err(RemoteError::Timeout {
                endpoint: request.endpoint,
                secs: 30,
            })
        }
    }
}

/// 只回答符号计算题的远程端点
struct SymbolicOnlyRemote;

impl RemoteClient for SymbolicOnlyRemote {
    fn solve(
        &self,
        request: RemoteRequest,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send {
        async move {
            if request.prompt.contains("Integrate") {
                Ok("-Cos[x] + C".to_string())
            } else {
                Err(RemoteError::NoChoices {
                    endpoint: request.endpoint,
                })
            }
        }
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("math_router_{}_{}", std::process::id(), name))
}

fn test_config(name: &str) -> Config {
    Config {
        output_log_file: temp_path(&format!("{name}_output.txt"))
            .to_string_lossy()
            .to_string(),
        max_concurrent_problems: 2,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_fallback_chain_end_to_end() {
    let dispatcher = SolveDispatcher::new(
        EvaluatorKind::Symbolic.build(),
        DownRemote,
        Box::new(StaticProbe(true)),
    );
    let config = SolverConfig::remote("https://example.invalid/v1/chat/completions", "sk-test");

    let text = "How many permutations of 5 items taken 2 at a time?";
    assert_eq!(classify(text), ProblemComplexity::DiscreteMath);

    let outcome = dispatcher.dispatch(text, &config).await;
    assert!(outcome.succeeded);
    assert_eq!(outcome.mode_used, SolverMode::Local);
    assert_eq!(
        outcome.text,
        "Solution: 20\n(remote solve failed: request to \
         https://example.invalid/v1/chat/completions timed out after 30s; answered offline)"
    );
}

#[tokio::test]
async fn test_each_problem_kind_offline() {
    let dispatcher = SolveDispatcher::new(
        EvaluatorKind::Symbolic.build(),
        DownRemote,
        Box::new(StaticProbe(false)),
    );
    let config = SolverConfig::local();

    let cases = [
        (ProblemKind::Expression, "Binomial[10, 3]", "Result: 120"),
        (
            ProblemKind::Proof,
            "Area of an Annulus",
            "Proof result: Integrate[2*Pi*rho, {rho, r, R}]",
        ),
        (ProblemKind::Word, "What is the factorial of 6?", "Solution: 720"),
        (ProblemKind::Word, "Tom has 4 pens and gets 6 more", "Solution: 10"),
    ];

    for (kind, text, expected) in cases {
        let outcome = dispatcher.dispatch_kind(kind, text, &config).await;
        assert!(outcome.succeeded, "{text}");
        assert_eq!(outcome.text, expected);
    }
}

#[tokio::test]
async fn test_batch_run_with_stub_remote() {
    let problems_path = temp_path("batch_problems.toml");
    std::fs::write(
        &problems_path,
        r#"
[[problems]]
kind = "expression"
text = "Integrate[Sin[x], x]"

[[problems]]
kind = "word"
text = "If I have 2 apples and I buy 3 more, how many apples do I have?"

[[problems]]
kind = "expression"
text = "1 / 0"

[[problems]]
text = "   "
"#,
    )
    .unwrap();

    let mut config = test_config("batch");
    config.auto_remote = true;

    let dispatcher = SolveDispatcher::new(
        config.evaluator.build(),
        SymbolicOnlyRemote,
        Box::new(StaticProbe(true)),
    );
    let app = App::with_dispatcher(config, dispatcher).unwrap();
    let stats = app.run_file(&problems_path).await.unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.remote, 1);

    let log = std::fs::read_to_string(&app.config().output_log_file).unwrap();
    assert!(log.contains("[题目 #1 类型 expression] ✅ (remote)"));
    assert!(log.contains("-Cos[x] + C"));
    assert!(log.contains("[题目 #2 类型 word] ✅ (local)"));
    assert!(log.contains("Solution: 5"));
    assert!(log.contains("[题目 #3 类型 expression] ❌ (local)"));
    assert!(log.contains("Division by zero"));

    let _ = std::fs::remove_file(&problems_path);
    let _ = std::fs::remove_file(&app.config().output_log_file);
}

#[tokio::test]
async fn test_batch_missing_file_is_error() {
    let dispatcher = SolveDispatcher::new(
        EvaluatorKind::Symbolic.build(),
        DownRemote,
        Box::new(StaticProbe(false)),
    );
    let config = test_config("missing");
    let app = App::with_dispatcher(config, dispatcher).unwrap();

    let result = app.run_file(&temp_path("does_not_exist.toml")).await;
    assert!(result.is_err());

    let _ = std::fs::remove_file(&app.config().output_log_file);
}

#[tokio::test]
async fn test_solve_one_appends_to_log() {
    let dispatcher = SolveDispatcher::new(
        EvaluatorKind::ArithmeticOnly.build(),
        DownRemote,
        Box::new(StaticProbe(false)),
    );
    let app = App::with_dispatcher(test_config("single"), dispatcher).unwrap();

    let outcome = app
        .solve_one(ProblemKind::Expression, "(1 + 2) * 3.5")
        .await
        .unwrap();
    assert_eq!(outcome.text, "Result: 10.5");

    let log = std::fs::read_to_string(&app.config().output_log_file).unwrap();
    assert!(log.contains("求解日志"));
    assert!(log.contains("Result: 10.5"));

    let _ = std::fs::remove_file(&app.config().output_log_file);
}

#[tokio::test]
async fn test_long_and_deep_inputs_do_not_abort() {
    let dispatcher = SolveDispatcher::new(
        EvaluatorKind::Symbolic.build(),
        DownRemote,
        Box::new(StaticProbe(false)),
    );
    let config = SolverConfig::local();

    let numbers = (0..200_000)
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let outcome = dispatcher
        .dispatch(&format!("What is the sum of {numbers}"), &config)
        .await;
    assert_eq!(outcome.text, "Solution: 19999900000");

    let nested = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
    let outcome = dispatcher
        .dispatch_kind(ProblemKind::Expression, &nested, &config)
        .await;
    assert!(!outcome.succeeded);
    assert!(outcome.text.starts_with("Parse error at position 32"));
}

#[tokio::test]
async fn test_default_config_escalates_hard_problems() {
    let config = Config::default();
    assert!(config.auto_remote);

    let dispatcher = SolveDispatcher::new(
        config.evaluator.build(),
        SymbolicOnlyRemote,
        Box::new(StaticProbe(true)),
    );
    let outcome = dispatcher
        .dispatch_kind(
            ProblemKind::Expression,
            "Integrate[Sin[x], x]",
            &config.solver_config(),
        )
        .await;
    assert_eq!(outcome.mode_used, SolverMode::Remote);
    assert_eq!(outcome.text, "-Cos[x] + C");
}

#[tokio::test]
#[ignore] // 默认忽略，需要外网和 REMOTE_API_KEY：cargo test -- --ignored
async fn test_live_remote_solve() {
    math_router::utils::logging::init(true);

    let config = Config::from_env();
    let dispatcher = SolveDispatcher::from_config(&config);
    let solver_config = SolverConfig {
        mode: SolverMode::Remote,
        ..config.solver_config()
    };

    let outcome = dispatcher
        .dispatch_kind(ProblemKind::Expression, "Integrate[Sin[x], x]", &solver_config)
        .await;

    println!("{:?}", outcome);
    assert!(outcome.succeeded);
}
