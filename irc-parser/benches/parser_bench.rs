use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use irc_parser::{Event, Parser, Status};

fn generate_privmsg_traffic(size: usize) -> Vec<u8> {
    let message = ":alice!anne@host.example PRIVMSG #chan :hello world, how is everyone\r\n";
    let mut data = Vec::with_capacity(size + message.len());
    while data.len() < size {
        data.extend_from_slice(message.as_bytes());
    }
    data.truncate(size);
    data
}

fn generate_ping_traffic(size: usize) -> Vec<u8> {
    let message = "PING :tungsten.example\r\n";
    let mut data = Vec::with_capacity(size + message.len());
    while data.len() < size {
        data.extend_from_slice(message.as_bytes());
    }
    data.truncate(size);
    data
}

fn generate_server_traffic(size: usize) -> Vec<u8> {
    let messages = [
        ":irc.example.net 001 alice :Welcome to the network\r\n",
        ":irc.example.net 372 alice :- message of the day\r\n",
        ":irc.example.net 353 alice = #chan :alice bob carol\r\n",
        ":bob!b@node.example JOIN #chan\r\n",
        ":carol!c@node.example MODE #chan +o alice\r\n",
    ];
    let mut data = Vec::with_capacity(size + 64);
    let mut i = 0;
    while data.len() < size {
        data.extend_from_slice(messages[i % messages.len()].as_bytes());
        i += 1;
    }
    data.truncate(size);
    data
}

fn generate_wide_params(size: usize) -> Vec<u8> {
    let message = "MODE #chan +ooov alice bob carol dave\r\n";
    let mut data = Vec::with_capacity(size + message.len());
    while data.len() < size {
        data.extend_from_slice(message.as_bytes());
    }
    data.truncate(size);
    data
}

fn counting_parser<'h>(hits: &'h mut u64) -> Parser<'h> {
    let mut parser = Parser::new();
    let hits = std::cell::Cell::from_mut(hits);
    for event in [
        Event::Nick,
        Event::Name,
        Event::Host,
        Event::Command,
        Event::Param,
        Event::End,
    ] {
        parser.bind(event, move |bytes: &[u8]| {
            hits.set(hits.get() + bytes.len() as u64 + 1);
            Status::Continue
        });
    }
    parser
}

fn bench_parser_throughput(c: &mut Criterion) {
    let sizes = [1024, 10 * 1024, 100 * 1024];

    let mut group = c.benchmark_group("parser_throughput");

    for size in sizes {
        group.throughput(Throughput::Bytes(size as u64));

        let privmsg = generate_privmsg_traffic(size);
        group.bench_function(format!("privmsg_{size}"), |b| {
            b.iter(|| {
                let mut parser = Parser::new();
                parser.advance(black_box(&privmsg));
            });
        });

        let ping = generate_ping_traffic(size);
        group.bench_function(format!("ping_{size}"), |b| {
            b.iter(|| {
                let mut parser = Parser::new();
                parser.advance(black_box(&ping));
            });
        });

        let server = generate_server_traffic(size);
        group.bench_function(format!("server_{size}"), |b| {
            b.iter(|| {
                let mut parser = Parser::new();
                parser.advance(black_box(&server));
            });
        });

        let wide = generate_wide_params(size);
        group.bench_function(format!("wide_params_{size}"), |b| {
            b.iter(|| {
                let mut parser = Parser::new();
                parser.advance(black_box(&wide));
            });
        });
    }

    group.finish();
}

fn bench_dispatch_overhead(c: &mut Criterion) {
    let size = 10 * 1024;
    let data = generate_server_traffic(size);

    let mut group = c.benchmark_group("dispatch_overhead");
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("unbound", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            parser.advance(black_box(&data));
        });
    });

    group.bench_function("all_bound", |b| {
        b.iter(|| {
            let mut hits = 0u64;
            let mut parser = counting_parser(&mut hits);
            parser.advance(black_box(&data));
            drop(parser);
            black_box(hits);
        });
    });

    group.finish();
}

fn bench_chunk_boundaries(c: &mut Criterion) {
    let data = generate_server_traffic(10 * 1024);
    let chunk_sizes = [1, 8, 64, 512, 1024];

    let mut group = c.benchmark_group("chunk_boundaries");

    for chunk_size in chunk_sizes {
        group.bench_function(format!("chunk_{chunk_size}"), |b| {
            b.iter(|| {
                let mut parser = Parser::new();
                for chunk in data.chunks(chunk_size) {
                    parser.advance(black_box(chunk));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_throughput,
    bench_dispatch_overhead,
    bench_chunk_boundaries
);
criterion_main!(benches);
