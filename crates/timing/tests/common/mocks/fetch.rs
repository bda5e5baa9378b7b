use mockall::mock;
use rvtiming_core::soc::InstructionFetch;

mock! {
    pub Fetch {}
    impl InstructionFetch for Fetch {
        fn fetch_u32(&mut self, addr: u64) -> u32;
    }
}
