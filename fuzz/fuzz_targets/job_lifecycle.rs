#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use testrack_core::types::{ActivitySpec, JobSpec, TestSpec};
use testrack_registry::{JobLifecycleManager, Store};

#[derive(Arbitrary, Debug)]
enum Op {
    Create { job: u8, status: u8 },
    Delete { job: u8 },
    AddActivity { job: u8, text: String },
    AddTest { job: u8, status: u8 },
    RemoveActivity { job: u8, id: u64 },
    RemoveTest { job: u8, id: u64 },
}

const STATUSES: [&str; 4] = ["PASS", "FAIL", "RUNNING", "BOGUS"];

fn job_id(n: u8) -> String {
    format!("job-{}", n % 4)
}

fuzz_target!(|ops: Vec<Op>| {
    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(rt) => rt,
        Err(_) => return,
    };
    let jobs = JobLifecycleManager::new(Store::seeded());

    runtime.block_on(async {
        for op in ops.into_iter().take(64) {
            match op {
                Op::Create { job, status } => {
                    let spec = JobSpec {
                        id: job_id(job),
                        name: "fuzz".to_owned(),
                        priority: "LOW".to_owned(),
                        status: STATUSES[usize::from(status) % STATUSES.len()].to_owned(),
                        timeout: 0,
                    };
                    let _ = jobs.create_job(spec).await;
                }
                Op::Delete { job } => {
                    let id = job_id(job);
                    if jobs.delete_job(&id).await.is_ok() {
                        // 삭제 후 하위 리소스가 남으면 안 됨
                        assert!(jobs.get_job(&id).await.is_err());
                        assert!(jobs.list_activities(&id).await.is_err());
                        assert!(jobs.list_tests(&id).await.is_err());
                    }
                }
                Op::AddActivity { job, text } => {
                    let spec = ActivitySpec {
                        activity: text,
                        time: None,
                    };
                    let _ = jobs.add_activity(&job_id(job), spec).await;
                }
                Op::AddTest { job, status } => {
                    let spec = TestSpec {
                        tag: "fuzz".to_owned(),
                        status: STATUSES[usize::from(status) % STATUSES.len()].to_owned(),
                    };
                    let _ = jobs.add_test(&job_id(job), spec).await;
                }
                Op::RemoveActivity { job, id } => {
                    let _ = jobs.remove_activity(&job_id(job), id).await;
                }
                Op::RemoveTest { job, id } => {
                    let _ = jobs.remove_test(&job_id(job), id).await;
                }
            }
        }

        // 목록의 모든 잡은 단건 조회와 일치해야 함
        for job in jobs.list_jobs().await {
            let fetched = jobs.get_job(&job.id).await;
            assert_eq!(fetched.ok().as_ref(), Some(&job));
        }
    });
});
