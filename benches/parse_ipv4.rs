use core::str::FromStr;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use netident::{Address, IpAddressString, Ipv4};

pub fn addr_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ipv4-address");
    [
        "10.1.1.1",
        "172.16.0.255",
        "198.10.199.250",
        "240.130.10.10",
    ]
    .iter()
    .for_each(|addr| {
        group.bench_with_input(BenchmarkId::new("stdlib", addr), addr, |b, addr| {
            b.iter(|| std::net::Ipv4Addr::from_str(addr))
        });
        group.bench_with_input(BenchmarkId::new("crate", addr), addr, |b, addr| {
            b.iter(|| Address::<Ipv4>::from_str(addr))
        });
    });
    group.finish();
}

pub fn subnet_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ipv4-subnet");
    [
        "10.1.1.1/32",
        "172.16.0.0/12",
        "198.10.199.250/31",
        "1.2.3-4.*",
        "0xa.11.013.11",
    ]
    .iter()
    .for_each(|subnet| {
        group.bench_with_input(BenchmarkId::new("crate", subnet), subnet, |b, subnet| {
            b.iter(|| IpAddressString::new(*subnet).get_address())
        });
    });
    group.finish();
}

criterion_group!(benches, addr_benchmark, subnet_benchmark,);
criterion_main!(benches);
