//! Framework de testes do kernel
//!
//! Suítes rodadas dentro do próprio kernel (feature `self_test`), sem o
//! harness do `std`. Resultados vão para a serial.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail,
    Skip,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Contagem de uma suíte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Executa suite de testes
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> SuiteReport {
    crate::kinfo!("=== Executando suite:");
    crate::kinfo!(name);

    let mut report = SuiteReport::default();

    for test in tests {
        match (test.func)() {
            TestResult::Pass => {
                crate::ktrace!(test.name);
                report.passed += 1;
            }
            TestResult::Fail => {
                crate::kerror!("[FAIL]");
                crate::kerror!(test.name);
                report.failed += 1;
            }
            TestResult::Skip => {
                crate::kwarn!("[SKIP]");
                crate::kwarn!(test.name);
                report.skipped += 1;
            }
        }
    }

    crate::kinfo!("Resultados: passed=", report.passed);
    if !report.all_passed() {
        crate::kerror!("Resultados: failed=", report.failed);
    }
    report
}
