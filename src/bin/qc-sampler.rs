fn main() -> Result<(), Box<dyn std::error::Error>> {
    qc_sampler::app::run_sampler(std::env::args().skip(1))
}
