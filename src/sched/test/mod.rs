//! Self-tests do escalonador e do depurador, rodados no boot com
//! `self_test`.


use crate::klib::test_framework::{run_test_suite, SuiteReport};

/// Executa todos os testes de escalonamento
pub fn run_sched_tests() -> SuiteReport {
    run_test_suite("Scheduler", sched_test::SCHED_TESTS)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_self_tests_pass_on_host() {
        let report = super::run_sched_tests();
        assert!(report.all_passed(), "{:?}", report);
        assert_eq!(report.skipped, 0);
    }
}
